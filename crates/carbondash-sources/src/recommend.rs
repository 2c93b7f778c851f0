// SPDX-License-Identifier: Apache-2.0

use carbondash_model::TenantId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Recommendation generation is the one expensive server round-trip worth
/// caching; the fixed staleness window is 24 hours from write time,
/// independent of read frequency.
pub const RECOMMENDATION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCacheConfig {
    pub ttl_ms: u64,
}

impl Default for RecommendationCacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: RECOMMENDATION_TTL_MS,
        }
    }
}

/// The persisted cache shape: the generated payload plus the user's
/// saved/implemented recommendation id lists, stamped at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct RecommendationEntry {
    pub payload: Value,
    #[serde(default)]
    pub saved_ids: Vec<String>,
    #[serde(default)]
    pub implemented_ids: Vec<String>,
    pub timestamp_ms: u64,
}

impl RecommendationEntry {
    #[must_use]
    pub fn new(payload: Value, timestamp_ms: u64) -> Self {
        Self {
            payload,
            saved_ids: Vec::new(),
            implemented_ids: Vec::new(),
            timestamp_ms,
        }
    }

    #[must_use]
    pub fn is_fresh(&self, ttl_ms: u64, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp_ms) < ttl_ms
    }
}

/// Time-boxed read-through cache, one entry per tenant, no capacity bound.
/// Not an LRU: expiry is from write time only. Wall-clock millis arrive as
/// explicit arguments; nothing here samples the clock.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    config: RecommendationCacheConfig,
    entries: HashMap<TenantId, RecommendationEntry>,
}

impl RecommendationCache {
    #[must_use]
    pub fn new(config: RecommendationCacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Cache hit only while the entry is inside the TTL window; expired
    /// entries are dropped on the way out and the caller must refetch.
    pub fn get(&mut self, tenant: &TenantId, now_ms: u64) -> Option<RecommendationEntry> {
        let ttl = self.config.ttl_ms;
        self.entries.retain(|_, e| e.is_fresh(ttl, now_ms));
        let hit = self.entries.get(tenant).cloned();
        debug!(tenant = %tenant, hit = hit.is_some(), "recommendation cache lookup");
        hit
    }

    /// Wholesale overwrite; no partial merge.
    pub fn put(&mut self, tenant: TenantId, entry: RecommendationEntry) {
        self.entries.insert(tenant, entry);
    }

    pub fn invalidate(&mut self, tenant: &TenantId) {
        self.entries.remove(tenant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::parse("acme").expect("tenant")
    }

    #[test]
    fn hit_just_inside_ttl_miss_just_past_it() {
        let mut cache = RecommendationCache::new(RecommendationCacheConfig::default());
        let t0 = 1_700_000_000_000_u64;
        cache.put(tenant(), RecommendationEntry::new(json!({"items": []}), t0));

        let almost = t0 + (23 * 60 + 59) * 60 * 1000;
        assert!(cache.get(&tenant(), almost).is_some());

        let past = t0 + (24 * 60 + 1) * 60 * 1000;
        assert!(cache.get(&tenant(), past).is_none());
    }

    #[test]
    fn put_overwrites_wholesale() {
        let mut cache = RecommendationCache::new(RecommendationCacheConfig::default());
        let mut first = RecommendationEntry::new(json!({"v": 1}), 100);
        first.saved_ids.push("r1".to_string());
        cache.put(tenant(), first);
        cache.put(tenant(), RecommendationEntry::new(json!({"v": 2}), 200));

        let entry = cache.get(&tenant(), 250).expect("hit");
        assert_eq!(entry.payload, json!({"v": 2}));
        assert!(entry.saved_ids.is_empty());
    }

    #[test]
    fn invalidate_removes_unconditionally() {
        let mut cache = RecommendationCache::new(RecommendationCacheConfig::default());
        cache.put(tenant(), RecommendationEntry::new(json!(null), 100));
        cache.invalidate(&tenant());
        assert!(cache.get(&tenant(), 101).is_none());
    }

    #[test]
    fn entries_are_tenant_scoped() {
        let mut cache = RecommendationCache::new(RecommendationCacheConfig::default());
        let other = TenantId::parse("globex").expect("tenant");
        cache.put(tenant(), RecommendationEntry::new(json!(1), 100));
        assert!(cache.get(&other, 101).is_none());
        assert!(cache.get(&tenant(), 101).is_some());
    }
}
