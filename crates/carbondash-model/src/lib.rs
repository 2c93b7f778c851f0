#![forbid(unsafe_code)]
//! Carbondash domain model SSOT.

mod activity;
mod aggregates;
mod breakdown;
mod period;
mod radar;
mod tenant;

pub use activity::{
    ActivityRecord, Scope, ScopeBasis, ScopeResolution, ACTIVITY_TYPE_MAX_LEN,
};
pub use aggregates::{CategoryAggregate, EmitterAggregate, UNCATEGORIZED};
pub use breakdown::{BreakdownOrigin, ScopeBreakdown, ScopeSlice, StatsSummary};
pub use period::{
    Granularity, PeriodBucket, ReportingWindow, BUCKET_TOTAL_TOLERANCE, DEFAULT_TRAILING_MONTHS,
};
pub use radar::{RadarOutcome, RadarSeriesPoint, RADAR_MAX_CATEGORIES, RADAR_MIN_CATEGORIES};
pub use tenant::{TenantId, ValidationError, TENANT_MAX_LEN};

pub const CRATE_NAME: &str = "carbondash-model";
