// SPDX-License-Identifier: Apache-2.0

use crate::tenant::ValidationError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a bucket total matches its scope sum.
pub const BUCKET_TOTAL_TOLERANCE: f64 = 1e-6;

pub const DEFAULT_TRAILING_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" | "annual" => Ok(Self::Year),
            other => Err(ValidationError(format!(
                "granularity must be day, month or year, got {other:?}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Inclusive date window scoping a fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ReportingWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportingWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError(format!(
                "window from {from} must not be after to {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Rolling window ending at `reference`, starting at the first day of the
    /// month `months - 1` months earlier. The analytics default is the
    /// trailing twelve months.
    #[must_use]
    pub fn trailing_months(reference: NaiveDate, months: u32) -> Self {
        let months = months.max(1);
        let from = reference
            .checked_sub_months(Months::new(months - 1))
            .and_then(|d| d.with_day(1))
            .unwrap_or(reference);
        Self {
            from,
            to: reference,
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Accumulated emissions for one day/month/year slot, in tonnes CO2e.
///
/// `sort_key` is the zero-padded sortable key (`YYYY`, `YYYY-MM`,
/// `YYYY-MM-DD`); `display_label` is the human-facing form and never
/// participates in ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodBucket {
    pub sort_key: String,
    pub display_label: String,
    pub scope1_t: f64,
    pub scope2_t: f64,
    pub scope3_t: f64,
    pub total_t: f64,
    pub member_count: u64,
}

impl PeriodBucket {
    #[must_use]
    pub fn scope_sum(&self) -> f64 {
        self.scope1_t + self.scope2_t + self.scope3_t
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sort_key.trim().is_empty() {
            return Err(ValidationError("bucket sort_key must not be empty".to_string()));
        }
        for v in [self.scope1_t, self.scope2_t, self.scope3_t, self.total_t] {
            if !v.is_finite() || v < 0.0 {
                return Err(ValidationError(
                    "bucket tonnage values must be finite and >= 0".to_string(),
                ));
            }
        }
        if (self.total_t - self.scope_sum()).abs() > BUCKET_TOTAL_TOLERANCE {
            return Err(ValidationError(format!(
                "bucket total {} does not match scope sum {}",
                self.total_t,
                self.scope_sum()
            )));
        }
        Ok(())
    }
}
