// SPDX-License-Identifier: Apache-2.0

use crate::error::SourceError;
use crate::reconcile::CycleSummaries;
use crate::traits::AnalyticsSource;
use carbondash_analytics::{
    normalize_records, AnalyticsLimits, AnalyticsQuery, FieldKeyPolicy, NormalizationReport,
    ScopeClassifier,
};
use carbondash_core::MachineError;
use carbondash_model::{EmitterAggregate, PeriodBucket, ScopeBreakdown, StatsSummary};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceKind {
    Activities,
    Timeline,
    ScopeBreakdown,
    TopEmitters,
    Stats,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::Timeline => "timeline",
            Self::ScopeBreakdown => "scope_breakdown",
            Self::TopEmitters => "top_emitters",
            Self::Stats => "stats",
        }
    }
}

pub const SOURCE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub error: SourceError,
}

/// Everything one concurrent fan-out produced, with per-source failures
/// retained instead of propagated. A failed source leaves its slot empty;
/// the reconciler's fallback chain does the rest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchCycle {
    pub activities_raw: Vec<Value>,
    pub timeline: Vec<PeriodBucket>,
    pub breakdown: Option<ScopeBreakdown>,
    pub top_emitters: Vec<EmitterAggregate>,
    pub stats: Option<StatsSummary>,
    pub failures: Vec<SourceFailure>,
}

impl FetchCycle {
    /// All five sources failed: the one condition surfaced to the user as a
    /// retryable error banner rather than an empty state.
    #[must_use]
    pub fn total_failure(&self) -> bool {
        self.failures.len() == SOURCE_COUNT
    }

    #[must_use]
    pub fn diagnostics(&self) -> Vec<MachineError> {
        self.failures
            .iter()
            .map(|f| f.error.to_machine(f.source.as_str()))
            .collect()
    }

    /// Normalize the raw activity slot and assemble the reconciler inputs.
    #[must_use]
    pub fn summaries(
        &self,
        policy: &FieldKeyPolicy,
        classifier: &ScopeClassifier,
    ) -> (CycleSummaries, NormalizationReport) {
        let batch = normalize_records(&self.activities_raw, policy, classifier);
        (
            CycleSummaries {
                authoritative: self.breakdown,
                timeline: self.timeline.clone(),
                activities: batch.records,
            },
            batch.report,
        )
    }
}

/// Issue all source calls concurrently and join once every one completed or
/// failed. No call blocks another; no retries; failures degrade to empty
/// placeholders.
pub async fn fetch_cycle(
    source: &dyn AnalyticsSource,
    query: &AnalyticsQuery,
    limits: &AnalyticsLimits,
) -> FetchCycle {
    let tenant = &query.tenant;
    let (activities, timeline, breakdown, emitters, stats) = tokio::join!(
        source.get_activities(query),
        source.get_timeline_series(query),
        source.get_scope_breakdown(tenant, query.window.as_ref()),
        source.get_top_emitters(tenant, limits.top_emitters),
        source.get_stats_summary(tenant),
    );

    let mut cycle = FetchCycle::default();
    let mut failures: Vec<SourceFailure> = Vec::new();
    let mut absorb = |kind: SourceKind, error: SourceError| {
        warn!(source = kind.as_str(), error = %error, "source degraded to empty placeholder");
        failures.push(SourceFailure { source: kind, error });
    };

    match activities {
        Ok(v) => cycle.activities_raw = v,
        Err(e) => absorb(SourceKind::Activities, e),
    }
    match timeline {
        Ok(v) => cycle.timeline = v,
        Err(e) => absorb(SourceKind::Timeline, e),
    }
    match breakdown {
        Ok(v) => cycle.breakdown = v,
        Err(e) => absorb(SourceKind::ScopeBreakdown, e),
    }
    match emitters {
        Ok(v) => cycle.top_emitters = v,
        Err(e) => absorb(SourceKind::TopEmitters, e),
    }
    match stats {
        Ok(v) => cycle.stats = Some(v),
        Err(e) => absorb(SourceKind::Stats, e),
    }
    cycle.failures = failures;

    info!(
        tenant = %tenant,
        failures = cycle.failures.len(),
        activities = cycle.activities_raw.len(),
        "fetch cycle joined"
    );
    cycle
}

/// Monotonic fetch generation counter. A re-fetch trigger (period change,
/// date-range change) begins a new epoch; results carrying a stale token
/// must be discarded rather than applied out of order.
#[derive(Debug, Default)]
pub struct FetchEpoch {
    counter: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochToken(u64);

impl FetchEpoch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch generation, superseding all earlier tokens.
    pub fn begin(&self) -> EpochToken {
        EpochToken(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: EpochToken) -> bool {
        self.counter.load(Ordering::SeqCst) == token.0
    }
}
