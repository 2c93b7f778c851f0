// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Fallback bucket name for records with no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Per-category rollup, descending by emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryAggregate {
    pub name: String,
    pub emissions_kg: f64,
    pub activity_count: u64,
    pub share: f64,
}

/// Per-emitter rollup (activity name, falling back to type), descending by
/// emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterAggregate {
    pub name: String,
    pub emissions_kg: f64,
    pub activity_count: u64,
    pub share: f64,
}
