use carbondash_model::{Scope, ScopeResolution};
use tracing::warn;

/// Resolves a scope number from possibly-absent fields in strict priority
/// order: explicit numeric field, then label text match, then the
/// value-chain default.
///
/// The default tier exists because nearly all unclassified activity in this
/// domain is Scope 3 by convention. It is never silent: the resolution is
/// tagged `DefaultValueChain` and logged as a data-quality warning so
/// downstream consumers can separate trusted from guessed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeClassifier {
    pub label_patterns: Vec<(String, Scope)>,
}

impl Default for ScopeClassifier {
    fn default() -> Self {
        Self {
            label_patterns: vec![
                ("scope 1".to_string(), Scope::S1),
                ("scope1".to_string(), Scope::S1),
                ("scope 2".to_string(), Scope::S2),
                ("scope2".to_string(), Scope::S2),
                ("scope 3".to_string(), Scope::S3),
                ("scope3".to_string(), Scope::S3),
            ],
        }
    }
}

impl ScopeClassifier {
    #[must_use]
    pub fn from_patterns(label_patterns: Vec<(String, Scope)>) -> Self {
        Self { label_patterns }
    }

    #[must_use]
    pub fn resolve(&self, explicit: Option<i64>, label: Option<&str>) -> ScopeResolution {
        if let Some(n) = explicit {
            if let Ok(scope) = Scope::parse_number(n) {
                return ScopeResolution::explicit(scope);
            }
        }
        if let Some(raw) = label {
            let needle = raw.to_lowercase();
            for (pattern, scope) in &self.label_patterns {
                if needle.contains(pattern.as_str()) {
                    return ScopeResolution::from_label(*scope);
                }
            }
        }
        warn!(
            explicit = ?explicit,
            label = ?label,
            "scope unresolved, defaulting to scope 3 (value chain)"
        );
        ScopeResolution::defaulted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbondash_model::ScopeBasis;

    #[test]
    fn explicit_number_wins_over_label() {
        let c = ScopeClassifier::default();
        let r = c.resolve(Some(1), Some("Scope 2 - purchased electricity"));
        assert_eq!(r.scope, Scope::S1);
        assert_eq!(r.basis, ScopeBasis::ExplicitField);
    }

    #[test]
    fn out_of_range_number_falls_through_to_label() {
        let c = ScopeClassifier::default();
        let r = c.resolve(Some(7), Some("scope2"));
        assert_eq!(r.scope, Scope::S2);
        assert_eq!(r.basis, ScopeBasis::LabelMatch);
    }

    #[test]
    fn label_match_is_case_insensitive_substring() {
        let c = ScopeClassifier::default();
        let r = c.resolve(None, Some("SCOPE 3 (value chain)"));
        assert_eq!(r.scope, Scope::S3);
        assert_eq!(r.basis, ScopeBasis::LabelMatch);
    }

    #[test]
    fn unresolved_defaults_to_inferred_scope3() {
        let c = ScopeClassifier::default();
        let r = c.resolve(None, Some("fleet diesel"));
        assert_eq!(r.scope, Scope::S3);
        assert!(r.is_inferred());
        let r = c.resolve(None, None);
        assert!(r.is_inferred());
    }
}
