use carbondash_core::{safe_share, SCALE_EPSILON};
use carbondash_model::{
    ActivityRecord, RadarOutcome, RadarSeriesPoint, RADAR_MIN_CATEGORIES, UNCATEGORIZED,
};
use std::collections::HashMap;

/// Rescale heterogeneous per-category metrics onto a shared 0-100 domain
/// for multi-axis comparison. Each metric column is normalized against its
/// own maximum, floored to [`SCALE_EPSILON`] so an all-zero column rescales
/// to zero instead of dividing by zero.
///
/// Fewer than [`RADAR_MIN_CATEGORIES`] non-empty categories is the
/// "insufficient data" signal, distinct from "no data yet".
#[must_use]
pub fn build_radar_series(records: &[ActivityRecord], max_categories: usize) -> RadarOutcome {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (f64, u64)> = HashMap::new();
    for record in records {
        let key = record
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let accum = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0.0, 0)
        });
        accum.0 += record.emissions_kg;
        accum.1 += 1;
    }

    if order.is_empty() {
        return RadarOutcome::NoData;
    }
    if order.len() < RADAR_MIN_CATEGORIES {
        return RadarOutcome::InsufficientCategories { found: order.len() };
    }

    let mut rows: Vec<(usize, String, f64, u64)> = order
        .into_iter()
        .enumerate()
        .filter_map(|(idx, name)| groups.remove(&name).map(|(kg, n)| (idx, name, kg, n)))
        .collect();
    rows.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    rows.truncate(max_categories);

    let avg_of = |kg: f64, n: u64| if n == 0 { 0.0 } else { kg / n as f64 };
    let max_kg = rows.iter().map(|r| r.2).fold(0.0_f64, f64::max);
    let max_count = rows.iter().map(|r| r.3 as f64).fold(0.0_f64, f64::max);
    let max_avg = rows
        .iter()
        .map(|r| avg_of(r.2, r.3))
        .fold(0.0_f64, f64::max);

    let rescale = |raw: f64, max: f64| 100.0 * safe_share(raw, max.max(SCALE_EPSILON));

    let points = rows
        .into_iter()
        .map(|(_, category, emissions_kg, activity_count)| {
            let avg_kg = avg_of(emissions_kg, activity_count);
            RadarSeriesPoint {
                category,
                emissions_kg,
                activity_count,
                avg_kg,
                emissions_score: rescale(emissions_kg, max_kg),
                count_score: rescale(activity_count as f64, max_count),
                avg_score: rescale(avg_kg, max_avg),
            }
        })
        .collect();
    RadarOutcome::Series { points }
}
