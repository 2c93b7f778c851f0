// SPDX-License-Identifier: Apache-2.0

use carbondash_analytics::{breakdown_from_records, breakdown_from_scope_kg};
use carbondash_core::KG_PER_TONNE;
use carbondash_model::{
    ActivityRecord, BreakdownOrigin, PeriodBucket, ScopeBreakdown,
};
use tracing::{debug, warn};

/// The per-cycle inputs the reconciler arbitrates over, one slot per
/// upstream summary. A failed fetch shows up here as an empty slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummaries {
    pub authoritative: Option<ScopeBreakdown>,
    pub timeline: Vec<PeriodBucket>,
    pub activities: Vec<ActivityRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledBreakdown {
    pub breakdown: ScopeBreakdown,
    pub origin: BreakdownOrigin,
}

/// Tier (a): the authoritative scope-breakdown endpoint, accepted only when
/// some scope total is strictly positive. An all-zero summary is treated as
/// absent so richer raw data can win.
#[must_use]
pub fn authoritative_tier(authoritative: Option<&ScopeBreakdown>) -> Option<ScopeBreakdown> {
    match authoritative {
        Some(b) if !b.is_degenerate() => Some(*b),
        _ => None,
    }
}

/// Tier (b): re-derive scope totals by summing the timeline series'
/// per-scope fields (tonnes back to kg).
#[must_use]
pub fn timeline_tier(timeline: &[PeriodBucket]) -> Option<ScopeBreakdown> {
    if timeline.is_empty() {
        return None;
    }
    let mut kg = [0.0_f64; 3];
    for bucket in timeline {
        kg[0] += bucket.scope1_t * KG_PER_TONNE;
        kg[1] += bucket.scope2_t * KG_PER_TONNE;
        kg[2] += bucket.scope3_t * KG_PER_TONNE;
    }
    let derived = breakdown_from_scope_kg(kg[0], kg[1], kg[2]);
    if derived.is_degenerate() {
        None
    } else {
        Some(derived)
    }
}

/// Tier (c): re-derive directly from classified raw activities.
#[must_use]
pub fn activity_tier(activities: &[ActivityRecord]) -> Option<ScopeBreakdown> {
    if activities.is_empty() {
        return None;
    }
    let derived = breakdown_from_records(activities);
    if derived.is_degenerate() {
        None
    } else {
        Some(derived)
    }
}

/// Select one breakdown via the ordered fallback chain. The UI must never
/// show a spuriously-empty breakdown merely because one upstream summary is
/// degenerate while richer raw data exists; all-empty input yields a zero
/// breakdown tagged `Empty` (the "no data yet" state, not an error).
#[must_use]
pub fn reconcile_scope_breakdown(summaries: &CycleSummaries) -> ReconciledBreakdown {
    let tiers: [(BreakdownOrigin, Option<ScopeBreakdown>); 3] = [
        (
            BreakdownOrigin::Authoritative,
            authoritative_tier(summaries.authoritative.as_ref()),
        ),
        (
            BreakdownOrigin::TimelineDerived,
            timeline_tier(&summaries.timeline),
        ),
        (
            BreakdownOrigin::ActivityDerived,
            activity_tier(&summaries.activities),
        ),
    ];
    for (origin, candidate) in tiers {
        if let Some(breakdown) = candidate {
            if origin != BreakdownOrigin::Authoritative {
                warn!(origin = origin.as_str(), "scope breakdown fell back to a derived tier");
            } else {
                debug!(origin = origin.as_str(), "scope breakdown resolved");
            }
            return ReconciledBreakdown { breakdown, origin };
        }
    }
    ReconciledBreakdown {
        breakdown: ScopeBreakdown::default(),
        origin: BreakdownOrigin::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbondash_analytics::breakdown_from_scope_kg;
    use carbondash_model::{Scope, ScopeResolution};

    fn bucket(s1: f64, s2: f64, s3: f64) -> PeriodBucket {
        PeriodBucket {
            sort_key: "2024-01".to_string(),
            display_label: "Jan 2024".to_string(),
            scope1_t: s1,
            scope2_t: s2,
            scope3_t: s3,
            total_t: s1 + s2 + s3,
            member_count: 1,
        }
    }

    fn activity(kg: f64, scope: Scope) -> ActivityRecord {
        ActivityRecord {
            emissions_kg: kg,
            scope: ScopeResolution::explicit(scope),
            activity_type: "t".to_string(),
            activity_name: None,
            category: None,
            quantity: None,
            unit: None,
            activity_date: None,
        }
    }

    #[test]
    fn authoritative_wins_when_positive() {
        let summaries = CycleSummaries {
            authoritative: Some(breakdown_from_scope_kg(10.0, 0.0, 0.0)),
            timeline: vec![bucket(9.0, 9.0, 9.0)],
            activities: vec![activity(1.0, Scope::S1)],
        };
        let reconciled = reconcile_scope_breakdown(&summaries);
        assert_eq!(reconciled.origin, BreakdownOrigin::Authoritative);
        assert!((reconciled.breakdown.total_kg - 10.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_authoritative_falls_back_to_timeline() {
        let summaries = CycleSummaries {
            authoritative: Some(ScopeBreakdown::default()),
            timeline: vec![bucket(1.0, 2.0, 0.5)],
            activities: Vec::new(),
        };
        let reconciled = reconcile_scope_breakdown(&summaries);
        assert_eq!(reconciled.origin, BreakdownOrigin::TimelineDerived);
        assert!((reconciled.breakdown.total_kg - 3500.0).abs() < 1e-6);
        assert!((reconciled.breakdown.scope2.total_kg - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn missing_summaries_fall_back_to_raw_activities() {
        let summaries = CycleSummaries {
            authoritative: None,
            timeline: Vec::new(),
            activities: vec![activity(600.0, Scope::S1), activity(400.0, Scope::S3)],
        };
        let reconciled = reconcile_scope_breakdown(&summaries);
        assert_eq!(reconciled.origin, BreakdownOrigin::ActivityDerived);
        assert!((reconciled.breakdown.total_kg - 1000.0).abs() < 1e-9);
        assert!((reconciled.breakdown.scope1.share - 0.6).abs() < 1e-9);
    }

    #[test]
    fn everything_empty_yields_tagged_zero_breakdown() {
        let reconciled = reconcile_scope_breakdown(&CycleSummaries::default());
        assert_eq!(reconciled.origin, BreakdownOrigin::Empty);
        assert_eq!(reconciled.breakdown.total_kg, 0.0);
        assert_eq!(reconciled.breakdown.scope1.share, 0.0);
    }

    #[test]
    fn tiers_are_testable_in_isolation() {
        assert_eq!(authoritative_tier(None), None);
        assert_eq!(authoritative_tier(Some(&ScopeBreakdown::default())), None);
        assert_eq!(timeline_tier(&[]), None);
        assert_eq!(timeline_tier(&[bucket(0.0, 0.0, 0.0)]), None);
        assert_eq!(activity_tier(&[]), None);
        assert!(timeline_tier(&[bucket(1.0, 0.0, 0.0)]).is_some());
    }
}
