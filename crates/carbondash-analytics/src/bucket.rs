use carbondash_core::kg_to_tonnes;
use carbondash_model::{
    ActivityRecord, Granularity, PeriodBucket, ReportingWindow, Scope, DEFAULT_TRAILING_MONTHS,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Resolve the effective window for a fetch cycle: the explicit window when
/// one was supplied, else the trailing-twelve-month default anchored at the
/// caller's reference date. The core never reads the wall clock.
#[must_use]
pub fn resolve_window(explicit: Option<ReportingWindow>, reference: NaiveDate) -> ReportingWindow {
    explicit.unwrap_or_else(|| ReportingWindow::trailing_months(reference, DEFAULT_TRAILING_MONTHS))
}

/// Bucketed series plus the diagnostic counts for records that could not be
/// placed. Skipped records never reduce the grand totals reported elsewhere.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BucketSeries {
    pub buckets: Vec<PeriodBucket>,
    pub undated_skipped: u64,
    pub outside_window: u64,
}

#[derive(Default)]
struct BucketAccum {
    scope1_kg: f64,
    scope2_kg: f64,
    scope3_kg: f64,
    member_count: u64,
}

/// Group valid-dated records into sparse period buckets keyed by a
/// zero-padded sortable string. Only periods with at least one record
/// materialize; iteration order is ascending `sort_key`, not insertion
/// order.
#[must_use]
pub fn bucket_by_period(
    records: &[ActivityRecord],
    granularity: Granularity,
    window: &ReportingWindow,
) -> BucketSeries {
    let mut accums: BTreeMap<String, (NaiveDate, BucketAccum)> = BTreeMap::new();
    let mut series = BucketSeries::default();

    for record in records {
        let Some(date) = record.activity_date else {
            series.undated_skipped += 1;
            continue;
        };
        if !window.contains(date) {
            series.outside_window += 1;
            continue;
        }
        let key = sort_key(date, granularity);
        let (_, accum) = accums.entry(key).or_insert_with(|| (date, BucketAccum::default()));
        match record.scope.scope {
            Scope::S1 => accum.scope1_kg += record.emissions_kg,
            Scope::S2 => accum.scope2_kg += record.emissions_kg,
            Scope::S3 => accum.scope3_kg += record.emissions_kg,
        }
        accum.member_count += 1;
    }

    series.buckets = accums
        .into_iter()
        .map(|(key, (date, accum))| {
            let scope1_t = kg_to_tonnes(accum.scope1_kg);
            let scope2_t = kg_to_tonnes(accum.scope2_kg);
            let scope3_t = kg_to_tonnes(accum.scope3_kg);
            PeriodBucket {
                sort_key: key,
                display_label: display_label(date, granularity),
                scope1_t,
                scope2_t,
                scope3_t,
                total_t: scope1_t + scope2_t + scope3_t,
                member_count: accum.member_count,
            }
        })
        .collect();
    series
}

/// Most recent `n` buckets, selected after ascending sort so "last N
/// periods" views stay chronological.
#[must_use]
pub fn last_n_buckets(mut buckets: Vec<PeriodBucket>, n: usize) -> Vec<PeriodBucket> {
    buckets.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    if buckets.len() > n {
        buckets.split_off(buckets.len() - n)
    } else {
        buckets
    }
}

#[must_use]
pub fn sort_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => format!("{:04}", date.year()),
    }
}

#[must_use]
pub fn display_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%b %-d, %Y").to_string(),
        Granularity::Month => date.format("%b %Y").to_string(),
        Granularity::Year => format!("{}", date.year()),
    }
}
