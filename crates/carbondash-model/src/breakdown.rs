// SPDX-License-Identifier: Apache-2.0

use crate::activity::Scope;
use serde::{Deserialize, Serialize};

/// One scope's slice of the grand total. `share` is in `[0, 1]` and is zero
/// whenever the grand total is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeSlice {
    pub total_kg: f64,
    pub share: f64,
}

/// Top-level scope summary for one fetch cycle. Recomputed wholesale on
/// every cycle; never merged incrementally across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeBreakdown {
    pub scope1: ScopeSlice,
    pub scope2: ScopeSlice,
    pub scope3: ScopeSlice,
    pub total_kg: f64,
}

impl ScopeBreakdown {
    #[must_use]
    pub fn slice(&self, scope: Scope) -> ScopeSlice {
        match scope {
            Scope::S1 => self.scope1,
            Scope::S2 => self.scope2,
            Scope::S3 => self.scope3,
        }
    }

    /// True when every scope total is zero or negative; an all-zero summary
    /// from an upstream endpoint is treated as absent by the reconciler.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.scope1.total_kg <= 0.0 && self.scope2.total_kg <= 0.0 && self.scope3.total_kg <= 0.0
    }
}

/// Which reconciler tier produced a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BreakdownOrigin {
    Authoritative,
    TimelineDerived,
    ActivityDerived,
    Empty,
}

impl BreakdownOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authoritative => "authoritative",
            Self::TimelineDerived => "timeline_derived",
            Self::ActivityDerived => "activity_derived",
            Self::Empty => "empty",
        }
    }
}

/// Headline numbers from the stats endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSummary {
    pub total_emissions_kg: f64,
    pub total_activities: u64,
    pub peak_period: Option<String>,
}
