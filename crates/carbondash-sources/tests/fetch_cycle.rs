use async_trait::async_trait;
use carbondash_analytics::{AnalyticsLimits, AnalyticsQuery, FieldKeyPolicy, ScopeClassifier};
use carbondash_model::{
    BreakdownOrigin, EmitterAggregate, Granularity, PeriodBucket, ReportingWindow, ScopeBreakdown,
    StatsSummary, TenantId,
};
use carbondash_sources::{
    fetch_cycle, reconcile_scope_breakdown, AnalyticsSource, SourceError, SourceKind,
};
use serde_json::{json, Value};

/// Scripted source: each endpoint either succeeds with canned data or fails
/// with a network error, independently of the others.
#[derive(Default)]
struct ScriptedSource {
    activities: Option<Vec<Value>>,
    timeline: Option<Vec<PeriodBucket>>,
    breakdown: Option<Option<ScopeBreakdown>>,
    emitters: Option<Vec<EmitterAggregate>>,
    stats: Option<StatsSummary>,
}

fn unavailable(name: &str) -> SourceError {
    SourceError::network(format!("{name} endpoint unavailable"))
}

#[async_trait]
impl AnalyticsSource for ScriptedSource {
    async fn get_activities(&self, _query: &AnalyticsQuery) -> Result<Vec<Value>, SourceError> {
        self.activities.clone().ok_or_else(|| unavailable("activities"))
    }

    async fn get_timeline_series(
        &self,
        _query: &AnalyticsQuery,
    ) -> Result<Vec<PeriodBucket>, SourceError> {
        self.timeline.clone().ok_or_else(|| unavailable("timeline"))
    }

    async fn get_scope_breakdown(
        &self,
        _tenant: &TenantId,
        _window: Option<&ReportingWindow>,
    ) -> Result<Option<ScopeBreakdown>, SourceError> {
        self.breakdown.ok_or_else(|| unavailable("scope_breakdown"))
    }

    async fn get_top_emitters(
        &self,
        _tenant: &TenantId,
        _limit: usize,
    ) -> Result<Vec<EmitterAggregate>, SourceError> {
        self.emitters.clone().ok_or_else(|| unavailable("top_emitters"))
    }

    async fn get_stats_summary(&self, _tenant: &TenantId) -> Result<StatsSummary, SourceError> {
        self.stats.clone().ok_or_else(|| unavailable("stats"))
    }
}

fn query() -> AnalyticsQuery {
    AnalyticsQuery::new(TenantId::parse("acme").expect("tenant"), Granularity::Month)
}

fn month_bucket(s2_t: f64) -> PeriodBucket {
    PeriodBucket {
        sort_key: "2024-01".to_string(),
        display_label: "Jan 2024".to_string(),
        scope1_t: 0.0,
        scope2_t: s2_t,
        scope3_t: 0.0,
        total_t: s2_t,
        member_count: 3,
    }
}

#[tokio::test]
async fn one_failing_source_leaves_the_others_populated() {
    let source = ScriptedSource {
        activities: Some(vec![json!({"emissionsKg": 10.0, "activityType": "fleet"})]),
        timeline: None, // fails
        breakdown: Some(None),
        emitters: Some(Vec::new()),
        stats: Some(StatsSummary::default()),
    };
    let cycle = fetch_cycle(&source, &query(), &AnalyticsLimits::default()).await;

    assert_eq!(cycle.failures.len(), 1);
    assert_eq!(cycle.failures[0].source, SourceKind::Timeline);
    assert_eq!(cycle.activities_raw.len(), 1);
    assert!(!cycle.total_failure());

    let diagnostics = cycle.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "network_error");
}

#[tokio::test]
async fn all_sources_failing_is_the_retryable_condition() {
    let source = ScriptedSource::default();
    let cycle = fetch_cycle(&source, &query(), &AnalyticsLimits::default()).await;
    assert!(cycle.total_failure());
    assert_eq!(cycle.diagnostics().len(), 5);
}

#[tokio::test]
async fn degraded_cycle_still_reconciles_from_raw_activities() {
    // Authoritative summary and timeline both fail; the raw activities are
    // rich enough that the breakdown must not come back empty.
    let source = ScriptedSource {
        activities: Some(vec![
            json!({"emissionsKg": 600.0, "scopeNumber": 1, "activityType": "fleet"}),
            json!({"emissionsKg": 400.0, "scopeLabel": "Scope 2", "activityType": "grid"}),
        ]),
        timeline: None,
        breakdown: None,
        emitters: Some(Vec::new()),
        stats: None,
    };
    let cycle = fetch_cycle(&source, &query(), &AnalyticsLimits::default()).await;
    let (summaries, report) =
        cycle.summaries(&FieldKeyPolicy::default(), &ScopeClassifier::default());
    assert_eq!(report.records_out, 2);

    let reconciled = reconcile_scope_breakdown(&summaries);
    assert_eq!(reconciled.origin, BreakdownOrigin::ActivityDerived);
    assert!((reconciled.breakdown.total_kg - 1000.0).abs() < 1e-9);
    assert!((reconciled.breakdown.scope1.share - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn zeroed_authoritative_summary_defers_to_timeline() {
    let source = ScriptedSource {
        activities: Some(Vec::new()),
        timeline: Some(vec![month_bucket(2.5)]),
        breakdown: Some(Some(ScopeBreakdown::default())),
        emitters: Some(Vec::new()),
        stats: Some(StatsSummary::default()),
    };
    let cycle = fetch_cycle(&source, &query(), &AnalyticsLimits::default()).await;
    assert!(cycle.failures.is_empty());

    let (summaries, _) = cycle.summaries(&FieldKeyPolicy::default(), &ScopeClassifier::default());
    let reconciled = reconcile_scope_breakdown(&summaries);
    assert_eq!(reconciled.origin, BreakdownOrigin::TimelineDerived);
    assert!((reconciled.breakdown.scope2.total_kg - 2500.0).abs() < 1e-6);
}

#[tokio::test]
async fn empty_tenant_yields_empty_origin_not_error() {
    let source = ScriptedSource {
        activities: Some(Vec::new()),
        timeline: Some(Vec::new()),
        breakdown: Some(None),
        emitters: Some(Vec::new()),
        stats: Some(StatsSummary::default()),
    };
    let cycle = fetch_cycle(&source, &query(), &AnalyticsLimits::default()).await;
    assert!(!cycle.total_failure());

    let (summaries, _) = cycle.summaries(&FieldKeyPolicy::default(), &ScopeClassifier::default());
    let reconciled = reconcile_scope_breakdown(&summaries);
    assert_eq!(reconciled.origin, BreakdownOrigin::Empty);
    assert_eq!(reconciled.breakdown.total_kg, 0.0);
}
