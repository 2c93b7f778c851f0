// SPDX-License-Identifier: Apache-2.0

use crate::error::SourceError;
use async_trait::async_trait;
use carbondash_analytics::AnalyticsQuery;
use carbondash_model::{
    EmitterAggregate, PeriodBucket, ReportingWindow, ScopeBreakdown, StatsSummary, TenantId,
};
use serde_json::Value;

/// The upstream summary endpoints, as abstract capabilities. The wire
/// format and transport belong to the excluded API-client layer; activities
/// arrive raw (pre-normalization) because upstream payload shapes drift.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn get_activities(&self, query: &AnalyticsQuery) -> Result<Vec<Value>, SourceError>;

    async fn get_timeline_series(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Vec<PeriodBucket>, SourceError>;

    async fn get_scope_breakdown(
        &self,
        tenant: &TenantId,
        window: Option<&ReportingWindow>,
    ) -> Result<Option<ScopeBreakdown>, SourceError>;

    async fn get_top_emitters(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<EmitterAggregate>, SourceError>;

    async fn get_stats_summary(&self, tenant: &TenantId) -> Result<StatsSummary, SourceError>;
}
