use serde::{Deserialize, Serialize};

/// Tunables for the aggregation pipeline. Callers construct one (usually
/// `Default`) and pass it down; nothing here is read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsLimits {
    pub top_categories: usize,
    pub top_emitters: usize,
    pub radar_max_categories: usize,
    pub max_timeline_points: usize,
}

impl Default for AnalyticsLimits {
    fn default() -> Self {
        Self {
            top_categories: 6,
            top_emitters: 5,
            radar_max_categories: carbondash_model::RADAR_MAX_CATEGORIES,
            max_timeline_points: 366,
        }
    }
}
