use carbondash_core::canonical;
use carbondash_model::{Granularity, ReportingWindow, TenantId};
use serde::{Deserialize, Serialize};

/// Immutable query parameters for one fetch cycle. Aggregation re-runs when
/// the fingerprint changes, not on ambient UI events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AnalyticsQuery {
    pub tenant: TenantId,
    pub granularity: Granularity,
    pub window: Option<ReportingWindow>,
    pub category: Option<String>,
    pub activity_type: Option<String>,
}

impl AnalyticsQuery {
    #[must_use]
    pub fn new(tenant: TenantId, granularity: Granularity) -> Self {
        Self {
            tenant,
            granularity,
            window: None,
            category: None,
            activity_type: None,
        }
    }

    /// Canonical form: filters trimmed and lowercased, blanks collapsed to
    /// absent, so equivalent queries fingerprint identically.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
        };
        let mut normalized = self.clone();
        normalized.category = clean(&self.category);
        normalized.activity_type = clean(&self.activity_type);
        normalized
    }

    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical::stable_json_hash_hex(&self.normalized())
    }

    /// Short token form of the fingerprint for log fields and cache keys.
    pub fn fingerprint_token(&self) -> Result<String, serde_json::Error> {
        canonical::compact_token(&self.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> AnalyticsQuery {
        AnalyticsQuery::new(
            TenantId::parse("acme").expect("tenant"),
            Granularity::Month,
        )
    }

    #[test]
    fn fingerprint_ignores_filter_casing_and_padding() {
        let mut a = query();
        a.category = Some("  Travel ".to_string());
        let mut b = query();
        b.category = Some("travel".to_string());
        assert_eq!(
            a.fingerprint().expect("fp"),
            b.fingerprint().expect("fp")
        );
    }

    #[test]
    fn blank_filter_equals_absent_filter() {
        let mut a = query();
        a.activity_type = Some("   ".to_string());
        let b = query();
        assert_eq!(a.fingerprint().expect("fp"), b.fingerprint().expect("fp"));
    }

    #[test]
    fn changed_parameters_change_the_fingerprint() {
        let a = query();
        let mut b = query();
        b.granularity = Granularity::Year;
        assert_ne!(a.fingerprint().expect("fp"), b.fingerprint().expect("fp"));
        assert_ne!(
            a.fingerprint_token().expect("fp"),
            b.fingerprint_token().expect("fp")
        );
    }
}
