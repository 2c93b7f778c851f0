#![forbid(unsafe_code)]
//! Pure aggregation pipeline: raw records in, derived chart-ready metrics
//! out. Every function here is deterministic over its inputs; failures
//! degrade to empty-but-well-typed values rather than escaping the
//! aggregation boundary.

mod bucket;
mod classify;
mod export;
mod limits;
mod metrics;
mod normalize;
mod query;
mod radar;

pub use bucket::{
    bucket_by_period, display_label, last_n_buckets, resolve_window, sort_key, BucketSeries,
};
pub use classify::ScopeClassifier;
pub use export::{export_flat_rows, to_csv, ExportRow, EXPORT_HEADER};
pub use limits::AnalyticsLimits;
pub use metrics::{
    average_kg_per_activity, breakdown_from_records, breakdown_from_scope_kg,
    build_category_aggregates, build_emitter_aggregates, grand_total_kg, RecordFilter,
};
pub use normalize::{
    normalize_records, parse_activity_date, FieldKeyPolicy, NormalizationReport, NormalizedBatch,
    UNKNOWN_ACTIVITY_TYPE,
};
pub use query::AnalyticsQuery;
pub use radar::build_radar_series;

pub const CRATE_NAME: &str = "carbondash-analytics";
