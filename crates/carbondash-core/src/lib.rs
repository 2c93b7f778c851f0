#![forbid(unsafe_code)]

use std::collections::BTreeMap;

pub const CRATE_NAME: &str = "carbondash-core";

/// Display unit conversion: stored values are kg CO2e, charts show tonnes.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Tolerance for floating-point equality of derived totals.
pub const FLOAT_TOLERANCE: f64 = 1e-6;

/// Floor for max-based rescaling denominators so an all-zero metric column
/// rescales to zero instead of dividing by zero.
pub const SCALE_EPSILON: f64 = 1e-9;

#[must_use]
pub fn kg_to_tonnes(kg: f64) -> f64 {
    kg / KG_PER_TONNE
}

/// Guarded ratio: `value / total` when `total > 0`, else `0.0`.
///
/// Every percentage in the pipeline goes through this so a degenerate grand
/// total yields zeros rather than NaN or infinity.
#[must_use]
pub fn safe_share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl std::fmt::Display for MachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for MachineError {}

pub mod canonical {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde::Serialize;
    use serde_json::{Map, Value};
    use sha2::{Digest, Sha256};

    pub fn stable_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
        let raw = serde_json::to_value(value)?;
        let normalized = normalize_json_value(raw);
        serde_json::to_vec(&normalized)
    }

    #[must_use]
    pub fn stable_hash_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn stable_json_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
        let bytes = stable_json_bytes(value)?;
        Ok(stable_hash_hex(&bytes))
    }

    /// Compact base64url form of the digest, for log fields and map keys.
    pub fn compact_token<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
        let bytes = stable_json_bytes(value)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        Ok(URL_SAFE_NO_PAD.encode(&digest[..16]))
    }

    fn normalize_json_value(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut sorted = Map::new();
                let mut entries: Vec<(String, Value)> = map
                    .into_iter()
                    .map(|(k, v)| (k, normalize_json_value(v)))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                for (k, v) in entries {
                    sorted.insert(k, v);
                }
                Value::Object(sorted)
            }
            Value::Array(items) => {
                Value::Array(items.into_iter().map(normalize_json_value).collect())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_share_never_produces_nan() {
        assert_eq!(safe_share(10.0, 0.0), 0.0);
        assert_eq!(safe_share(0.0, 0.0), 0.0);
        assert_eq!(safe_share(-5.0, 0.0), 0.0);
        let share = safe_share(1.0, 3.0);
        assert!(share.is_finite());
        assert!((share - 1.0 / 3.0).abs() < FLOAT_TOLERANCE);
    }

    #[test]
    fn kg_to_tonnes_divides_by_thousand() {
        assert!((kg_to_tonnes(2500.0) - 2.5).abs() < FLOAT_TOLERANCE);
        assert_eq!(kg_to_tonnes(0.0), 0.0);
    }

    #[test]
    fn canonical_hash_is_key_order_independent() {
        let a = json!({"tenant": "acme", "granularity": "month"});
        let b = json!({"granularity": "month", "tenant": "acme"});
        let ha = canonical::stable_json_hash_hex(&a).expect("hash a");
        let hb = canonical::stable_json_hash_hex(&b).expect("hash b");
        assert_eq!(ha, hb);
    }

    #[test]
    fn compact_token_is_stable_and_short() {
        let v = json!({"k": [1, 2, 3]});
        let t1 = canonical::compact_token(&v).expect("token");
        let t2 = canonical::compact_token(&v).expect("token");
        assert_eq!(t1, t2);
        assert!(t1.len() < 32);
    }

    #[test]
    fn machine_error_carries_details() {
        let err = MachineError::new("source_unavailable", "timeline fetch failed")
            .with_detail("source", "timeline");
        assert_eq!(err.details.get("source").map(String::as_str), Some("timeline"));
        assert_eq!(err.to_string(), "source_unavailable: timeline fetch failed");
    }
}
