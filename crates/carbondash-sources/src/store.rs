// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::recommend::RecommendationEntry;
use carbondash_model::TenantId;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Local single-file store backing the recommendation cache across process
/// restarts. One row per tenant; `save` overwrites wholesale, matching the
/// in-memory gate's semantics.
pub struct RecommendationStore {
    conn: Connection,
}

impl RecommendationStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS recommendations (
                tenant TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_ids TEXT NOT NULL DEFAULT '[]',
                implemented_ids TEXT NOT NULL DEFAULT '[]',
                timestamp_ms INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn save(&self, tenant: &TenantId, entry: &RecommendationEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO recommendations (tenant, payload, saved_ids, implemented_ids, timestamp_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(tenant) DO UPDATE SET
                payload = excluded.payload,
                saved_ids = excluded.saved_ids,
                implemented_ids = excluded.implemented_ids,
                timestamp_ms = excluded.timestamp_ms",
            params![
                tenant.as_str(),
                serde_json::to_string(&entry.payload)?,
                serde_json::to_string(&entry.saved_ids)?,
                serde_json::to_string(&entry.implemented_ids)?,
                entry.timestamp_ms as i64,
            ],
        )?;
        Ok(())
    }

    /// Load the tenant's entry if it is still inside the TTL window.
    pub fn load(
        &self,
        tenant: &TenantId,
        ttl_ms: u64,
        now_ms: u64,
    ) -> Result<Option<RecommendationEntry>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, saved_ids, implemented_ids, timestamp_ms
                FROM recommendations WHERE tenant = ?1",
                params![tenant.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((payload, saved, implemented, timestamp)) = row else {
            return Ok(None);
        };
        let entry = RecommendationEntry {
            payload: serde_json::from_str::<Value>(&payload)?,
            saved_ids: serde_json::from_str(&saved)?,
            implemented_ids: serde_json::from_str(&implemented)?,
            timestamp_ms: timestamp.max(0) as u64,
        };
        if entry.is_fresh(ttl_ms, now_ms) {
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    /// Append to the saved-id list without refreshing the TTL stamp.
    pub fn mark_saved(&self, tenant: &TenantId, id: &str) -> Result<(), StoreError> {
        self.append_id(tenant, id, "saved_ids")
    }

    /// Append to the implemented-id list without refreshing the TTL stamp.
    pub fn mark_implemented(&self, tenant: &TenantId, id: &str) -> Result<(), StoreError> {
        self.append_id(tenant, id, "implemented_ids")
    }

    fn append_id(&self, tenant: &TenantId, id: &str, column: &str) -> Result<(), StoreError> {
        let current: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT {column} FROM recommendations WHERE tenant = ?1"),
                params![tenant.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(raw) = current else {
            return Err(StoreError(format!(
                "no recommendation entry for tenant {tenant}"
            )));
        };
        let mut ids: Vec<String> = serde_json::from_str(&raw)?;
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
        self.conn.execute(
            &format!("UPDATE recommendations SET {column} = ?1 WHERE tenant = ?2"),
            params![serde_json::to_string(&ids)?, tenant.as_str()],
        )?;
        Ok(())
    }

    pub fn invalidate(&self, tenant: &TenantId) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM recommendations WHERE tenant = ?1",
            params![tenant.as_str()],
        )?;
        Ok(())
    }
}

/// Wall-clock sampling lives at this outermost layer only; everything below
/// takes `now_ms` explicitly.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
