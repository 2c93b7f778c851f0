#![forbid(unsafe_code)]
//! Effectful boundary of the analytics engine: source capabilities,
//! concurrent fan-out with per-source failure isolation, the multi-tier
//! scope-breakdown reconciler, and the recommendation cache gate.

mod error;
mod fanout;
mod reconcile;
mod recommend;
mod store;
mod traits;

pub use error::{SourceError, SourceErrorCode, StoreError};
pub use fanout::{
    fetch_cycle, EpochToken, FetchCycle, FetchEpoch, SourceFailure, SourceKind, SOURCE_COUNT,
};
pub use reconcile::{
    activity_tier, authoritative_tier, reconcile_scope_breakdown, timeline_tier, CycleSummaries,
    ReconciledBreakdown,
};
pub use recommend::{
    RecommendationCache, RecommendationCacheConfig, RecommendationEntry, RECOMMENDATION_TTL_MS,
};
pub use store::{now_ms, RecommendationStore};
pub use traits::AnalyticsSource;

pub const CRATE_NAME: &str = "carbondash-sources";
