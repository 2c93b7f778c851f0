use carbondash_core::kg_to_tonnes;
use carbondash_model::ActivityRecord;
use serde::{Deserialize, Serialize};

/// Flat tabular row for the CSV/JSON export collaborators. Undated records
/// export with an empty date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ExportRow {
    pub date: String,
    pub activity_type: String,
    pub activity_name: String,
    pub category: String,
    pub scope_label: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub emissions_kg: f64,
    pub emissions_t: f64,
}

pub const EXPORT_HEADER: &[&str] = &[
    "date",
    "activity_type",
    "activity_name",
    "category",
    "scope",
    "quantity",
    "unit",
    "emissions_kg",
    "emissions_t",
];

#[must_use]
pub fn export_flat_rows(records: &[ActivityRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| ExportRow {
            date: record
                .activity_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            activity_type: record.activity_type.clone(),
            activity_name: record.activity_name.clone().unwrap_or_default(),
            category: record.category.clone().unwrap_or_default(),
            scope_label: record.scope.scope.label().to_string(),
            quantity: record.quantity,
            unit: record.unit.clone().unwrap_or_default(),
            emissions_kg: record.emissions_kg,
            emissions_t: kg_to_tonnes(record.emissions_kg),
        })
        .collect()
}

/// Header plus one line per row; fields containing separators or quotes are
/// double-quote escaped.
#[must_use]
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(&EXPORT_HEADER.join(","));
    out.push('\n');
    for row in rows {
        let fields = [
            csv_field(&row.date),
            csv_field(&row.activity_type),
            csv_field(&row.activity_name),
            csv_field(&row.category),
            csv_field(&row.scope_label),
            row.quantity.map(|q| q.to_string()).unwrap_or_default(),
            csv_field(&row.unit),
            row.emissions_kg.to_string(),
            row.emissions_t.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
