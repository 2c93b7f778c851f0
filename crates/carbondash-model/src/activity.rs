// SPDX-License-Identifier: Apache-2.0

use crate::tenant::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ACTIVITY_TYPE_MAX_LEN: usize = 128;

/// GHG Protocol emission scope: direct, energy-indirect, value-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    S1,
    S2,
    S3,
}

impl Scope {
    pub fn parse_number(n: i64) -> Result<Self, ValidationError> {
        match n {
            1 => Ok(Self::S1),
            2 => Ok(Self::S2),
            3 => Ok(Self::S3),
            other => Err(ValidationError(format!(
                "scope number must be 1, 2 or 3, got {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::S1 => 1,
            Self::S2 => 2,
            Self::S3 => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::S1 => "Scope 1",
            Self::S2 => "Scope 2",
            Self::S3 => "Scope 3",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a scope classification was reached. `DefaultValueChain` marks the
/// guessed tier so consumers can separate trusted from inferred data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ScopeBasis {
    ExplicitField,
    LabelMatch,
    DefaultValueChain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeResolution {
    pub scope: Scope,
    pub basis: ScopeBasis,
}

impl ScopeResolution {
    #[must_use]
    pub const fn explicit(scope: Scope) -> Self {
        Self {
            scope,
            basis: ScopeBasis::ExplicitField,
        }
    }

    #[must_use]
    pub const fn from_label(scope: Scope) -> Self {
        Self {
            scope,
            basis: ScopeBasis::LabelMatch,
        }
    }

    #[must_use]
    pub const fn defaulted() -> Self {
        Self {
            scope: Scope::S3,
            basis: ScopeBasis::DefaultValueChain,
        }
    }

    #[must_use]
    pub const fn is_inferred(self) -> bool {
        matches!(self.basis, ScopeBasis::DefaultValueChain)
    }
}

/// One recorded emission-causing event, post-normalization.
///
/// A missing date keeps the record in aggregate totals but excludes it from
/// any date-bucketed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityRecord {
    pub emissions_kg: f64,
    pub scope: ScopeResolution,
    pub activity_type: String,
    pub activity_name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub activity_date: Option<NaiveDate>,
}

impl ActivityRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.emissions_kg.is_finite() || self.emissions_kg < 0.0 {
            return Err(ValidationError(
                "emissions_kg must be finite and >= 0".to_string(),
            ));
        }
        if self.activity_type.trim().is_empty() {
            return Err(ValidationError(
                "activity_type must not be empty".to_string(),
            ));
        }
        if self.activity_type.len() > ACTIVITY_TYPE_MAX_LEN {
            return Err(ValidationError(format!(
                "activity_type exceeds max length {ACTIVITY_TYPE_MAX_LEN}"
            )));
        }
        if let Some(q) = self.quantity {
            if !q.is_finite() {
                return Err(ValidationError("quantity must be finite".to_string()));
            }
        }
        Ok(())
    }

    /// Name used for emitter rankings; falls back to the activity type.
    #[must_use]
    pub fn emitter_name(&self) -> &str {
        match &self.activity_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.activity_type,
        }
    }
}
