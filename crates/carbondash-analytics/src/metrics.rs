use carbondash_core::safe_share;
use carbondash_model::{
    ActivityRecord, CategoryAggregate, EmitterAggregate, ReportingWindow, Scope, ScopeBreakdown,
    ScopeSlice, UNCATEGORIZED,
};
use std::collections::HashMap;

/// Optional pre-filter applied before aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub window: Option<ReportingWindow>,
    pub category: Option<String>,
    pub activity_type: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        if let Some(window) = &self.window {
            match record.activity_date {
                Some(date) if window.contains(date) => {}
                _ => return false,
            }
        }
        if let Some(category) = &self.category {
            let record_category = record.category.as_deref().unwrap_or(UNCATEGORIZED);
            if !record_category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(activity_type) = &self.activity_type {
            if !record.activity_type.eq_ignore_ascii_case(activity_type) {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn apply<'a>(&self, records: &'a [ActivityRecord]) -> Vec<&'a ActivityRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[must_use]
pub fn grand_total_kg(records: &[ActivityRecord]) -> f64 {
    records.iter().map(|r| r.emissions_kg).sum()
}

/// Average emissions per activity; zero for an empty set, never a division
/// error.
#[must_use]
pub fn average_kg_per_activity(records: &[ActivityRecord]) -> f64 {
    if records.is_empty() {
        0.0
    } else {
        grand_total_kg(records) / records.len() as f64
    }
}

/// Scope totals in kg folded into a breakdown with guarded shares.
#[must_use]
pub fn breakdown_from_scope_kg(scope1_kg: f64, scope2_kg: f64, scope3_kg: f64) -> ScopeBreakdown {
    let total_kg = scope1_kg + scope2_kg + scope3_kg;
    let slice = |kg: f64| ScopeSlice {
        total_kg: kg,
        share: safe_share(kg, total_kg),
    };
    ScopeBreakdown {
        scope1: slice(scope1_kg),
        scope2: slice(scope2_kg),
        scope3: slice(scope3_kg),
        total_kg,
    }
}

/// Derive a breakdown directly from classified records.
#[must_use]
pub fn breakdown_from_records(records: &[ActivityRecord]) -> ScopeBreakdown {
    let mut totals = [0.0_f64; 3];
    for record in records {
        match record.scope.scope {
            Scope::S1 => totals[0] += record.emissions_kg,
            Scope::S2 => totals[1] += record.emissions_kg,
            Scope::S3 => totals[2] += record.emissions_kg,
        }
    }
    breakdown_from_scope_kg(totals[0], totals[1], totals[2])
}

#[derive(Default)]
struct GroupAccum {
    emissions_kg: f64,
    activity_count: u64,
}

/// Group records by a key, preserving first-encounter order for the stable
/// tie-break, then sort descending by emissions and truncate to `top_n`.
fn grouped_descending<F>(
    records: &[ActivityRecord],
    top_n: Option<usize>,
    mut key_of: F,
) -> Vec<(String, f64, u64, f64)>
where
    F: FnMut(&ActivityRecord) -> String,
{
    let grand_total = grand_total_kg(records);
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupAccum> = HashMap::new();

    for record in records {
        let key = key_of(record);
        let accum = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            GroupAccum::default()
        });
        accum.emissions_kg += record.emissions_kg;
        accum.activity_count += 1;
    }

    let mut rows: Vec<(usize, String, GroupAccum)> = order
        .into_iter()
        .enumerate()
        .filter_map(|(idx, name)| groups.remove(&name).map(|accum| (idx, name, accum)))
        .collect();
    rows.sort_by(|a, b| {
        b.2.emissions_kg
            .partial_cmp(&a.2.emissions_kg)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    rows.into_iter()
        .map(|(_, name, accum)| {
            let share = safe_share(accum.emissions_kg, grand_total);
            (name, accum.emissions_kg, accum.activity_count, share)
        })
        .collect()
}

#[must_use]
pub fn build_category_aggregates(
    records: &[ActivityRecord],
    top_n: Option<usize>,
) -> Vec<CategoryAggregate> {
    grouped_descending(records, top_n, |r| {
        r.category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    })
    .into_iter()
    .map(|(name, emissions_kg, activity_count, share)| CategoryAggregate {
        name,
        emissions_kg,
        activity_count,
        share,
    })
    .collect()
}

#[must_use]
pub fn build_emitter_aggregates(
    records: &[ActivityRecord],
    top_n: Option<usize>,
) -> Vec<EmitterAggregate> {
    grouped_descending(records, top_n, |r| r.emitter_name().to_string())
        .into_iter()
        .map(|(name, emissions_kg, activity_count, share)| EmitterAggregate {
            name,
            emissions_kg,
            activity_count,
            share,
        })
        .collect()
}
