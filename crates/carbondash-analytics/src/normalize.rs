use crate::classify::ScopeClassifier;
use carbondash_model::ActivityRecord;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const UNKNOWN_ACTIVITY_TYPE: &str = "unknown";

/// Ordered attribute-key lists for coercing one loosely-typed upstream
/// record into an [`ActivityRecord`]. First present, non-empty key wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldKeyPolicy {
    pub emissions_keys: Vec<String>,
    pub scope_number_keys: Vec<String>,
    pub scope_label_keys: Vec<String>,
    pub activity_type_keys: Vec<String>,
    pub activity_name_keys: Vec<String>,
    pub category_keys: Vec<String>,
    pub quantity_keys: Vec<String>,
    pub unit_keys: Vec<String>,
    pub date_keys: Vec<String>,
}

impl Default for FieldKeyPolicy {
    fn default() -> Self {
        Self {
            emissions_keys: vec![
                "emissionsKg".to_string(),
                "emissions_kg".to_string(),
                "co2eKg".to_string(),
                "emissions".to_string(),
            ],
            scope_number_keys: vec!["scopeNumber".to_string(), "scope".to_string()],
            scope_label_keys: vec![
                "scopeLabel".to_string(),
                "scope_label".to_string(),
                "scope".to_string(),
            ],
            activity_type_keys: vec!["activityType".to_string(), "type".to_string()],
            activity_name_keys: vec![
                "activityName".to_string(),
                "name".to_string(),
                "description".to_string(),
            ],
            category_keys: vec!["category".to_string(), "activityCategory".to_string()],
            quantity_keys: vec!["quantity".to_string(), "amount".to_string()],
            unit_keys: vec!["unit".to_string(), "uom".to_string()],
            date_keys: vec![
                "activityDate".to_string(),
                "date".to_string(),
                "createdAt".to_string(),
            ],
        }
    }
}

/// Diagnostics retained while normalizing a batch. Counts never reduce the
/// totals reported elsewhere; they exist so degraded input is visible
/// instead of silently absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct NormalizationReport {
    pub records_in: u64,
    pub records_out: u64,
    pub dropped_non_objects: u64,
    pub defaulted_emissions: u64,
    pub clamped_negative_emissions: u64,
    pub invalid_dates: u64,
    pub inferred_scopes: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedBatch {
    pub records: Vec<ActivityRecord>,
    pub report: NormalizationReport,
}

/// Coerce a batch of raw upstream objects. Individual records never fail
/// the batch: absent emissions default to zero, unparsable dates flag the
/// record out of bucketed views, non-objects are dropped with a count.
#[must_use]
pub fn normalize_records(
    raw: &[Value],
    policy: &FieldKeyPolicy,
    classifier: &ScopeClassifier,
) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    batch.report.records_in = raw.len() as u64;
    for value in raw {
        let Some(obj) = value.as_object() else {
            batch.report.dropped_non_objects += 1;
            continue;
        };

        let emissions_kg = match first_f64(obj, &policy.emissions_keys) {
            Some(kg) if kg < 0.0 => {
                batch.report.clamped_negative_emissions += 1;
                0.0
            }
            Some(kg) => kg,
            None => {
                batch.report.defaulted_emissions += 1;
                0.0
            }
        };

        let explicit_scope = first_i64(obj, &policy.scope_number_keys);
        let scope_label = first_str(obj, &policy.scope_label_keys);
        let scope = classifier.resolve(explicit_scope, scope_label.as_deref());
        if scope.is_inferred() {
            batch.report.inferred_scopes += 1;
        }

        let activity_date = match first_str(obj, &policy.date_keys) {
            Some(raw_date) => match parse_activity_date(&raw_date) {
                Some(date) => Some(date),
                None => {
                    batch.report.invalid_dates += 1;
                    warn!(raw = %raw_date, "unparsable activity date, excluding from bucketed views");
                    None
                }
            },
            None => None,
        };

        batch.records.push(ActivityRecord {
            emissions_kg,
            scope,
            activity_type: first_str(obj, &policy.activity_type_keys)
                .unwrap_or_else(|| UNKNOWN_ACTIVITY_TYPE.to_string()),
            activity_name: first_str(obj, &policy.activity_name_keys),
            category: first_str(obj, &policy.category_keys),
            quantity: first_f64(obj, &policy.quantity_keys),
            unit: first_str(obj, &policy.unit_keys),
            activity_date,
        });
    }
    batch.report.records_out = batch.records.len() as u64;
    batch
}

/// RFC3339 timestamps and plain `YYYY-MM-DD` both occur upstream.
#[must_use]
pub fn parse_activity_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.date_naive());
    }
    None
}

fn first_f64(obj: &serde_json::Map<String, Value>, keys: &[String]) -> Option<f64> {
    for key in keys {
        match obj.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    if v.is_finite() {
                        return Some(v);
                    }
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    if v.is_finite() {
                        return Some(v);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn first_i64(obj: &serde_json::Map<String, Value>, keys: &[String]) -> Option<i64> {
    for key in keys {
        match obj.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    return Some(v);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<i64>() {
                    return Some(v);
                }
            }
            _ => {}
        }
    }
    None
}

fn first_str(obj: &serde_json::Map<String, Value>, keys: &[String]) -> Option<String> {
    for key in keys {
        if let Some(Value::String(s)) = obj.get(key) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbondash_model::Scope;
    use serde_json::json;

    fn normalize(values: Vec<Value>) -> NormalizedBatch {
        normalize_records(&values, &FieldKeyPolicy::default(), &ScopeClassifier::default())
    }

    #[test]
    fn missing_emissions_defaults_to_zero_and_keeps_record() {
        let batch = normalize(vec![json!({"activityType": "travel", "scope": 3})]);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].emissions_kg, 0.0);
        assert_eq!(batch.report.defaulted_emissions, 1);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let batch = normalize(vec![json!({
            "emissionsKg": "1250.5",
            "scopeNumber": "2",
            "activityType": "electricity",
            "quantity": "40.0"
        })]);
        let rec = &batch.records[0];
        assert_eq!(rec.emissions_kg, 1250.5);
        assert_eq!(rec.scope.scope, Scope::S2);
        assert_eq!(rec.quantity, Some(40.0));
    }

    #[test]
    fn negative_emissions_clamp_to_zero() {
        let batch = normalize(vec![json!({"emissionsKg": -3.0, "activityType": "x"})]);
        assert_eq!(batch.records[0].emissions_kg, 0.0);
        assert_eq!(batch.report.clamped_negative_emissions, 1);
    }

    #[test]
    fn bad_date_is_flagged_but_record_survives() {
        let batch = normalize(vec![json!({
            "emissionsKg": 10.0,
            "activityType": "freight",
            "activityDate": "not-a-date"
        })]);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].activity_date, None);
        assert_eq!(batch.report.invalid_dates, 1);
    }

    #[test]
    fn rfc3339_and_plain_dates_both_parse() {
        assert_eq!(
            parse_activity_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_activity_date("2024-01-15T08:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_activity_date("15/01/2024"), None);
    }

    #[test]
    fn non_object_entries_are_dropped_with_count() {
        let batch = normalize(vec![json!(42), json!({"activityType": "x"})]);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.report.dropped_non_objects, 1);
        assert_eq!(batch.report.records_in, 2);
        assert_eq!(batch.report.records_out, 1);
    }

    #[test]
    fn quantity_and_unit_are_optional() {
        let batch = normalize(vec![json!({
            "emissionsKg": 5.0,
            "activityType": "fuel",
            "unit": "L"
        })]);
        let rec = &batch.records[0];
        assert_eq!(rec.quantity, None);
        assert_eq!(rec.unit.as_deref(), Some("L"));
        assert!(rec.validate().is_ok());
    }
}
