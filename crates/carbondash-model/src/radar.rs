// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Most categories a comparison chart will plot on one radar.
pub const RADAR_MAX_CATEGORIES: usize = 8;

/// Minimum non-empty categories for a meaningful multi-axis comparison.
pub const RADAR_MIN_CATEGORIES: usize = 2;

/// One category axis with raw metrics and their 0-100 rescaled scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadarSeriesPoint {
    pub category: String,
    pub emissions_kg: f64,
    pub activity_count: u64,
    pub avg_kg: f64,
    pub emissions_score: f64,
    pub count_score: f64,
    pub avg_score: f64,
}

/// Radar output distinguishes "no data yet" from "add more activity types":
/// the UI renders different empty states for the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RadarOutcome {
    NoData,
    InsufficientCategories { found: usize },
    Series { points: Vec<RadarSeriesPoint> },
}

impl RadarOutcome {
    #[must_use]
    pub fn points(&self) -> &[RadarSeriesPoint] {
        match self {
            Self::Series { points } => points,
            _ => &[],
        }
    }
}
