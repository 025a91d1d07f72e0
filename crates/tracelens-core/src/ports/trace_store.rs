//! TraceStore port - decision trace の正本（source of truth）
//!
//! TraceStore は外部システムです。この crate は読み取りのみ行います。
//!
//! # 実装
//! - **InMemoryTraceStore**: 開発・テスト用（`impls::inmem_traces`）

use async_trait::async_trait;

use crate::domain::{AgentDecisionTrace, RunId, StoreError, TenantId, TraceId};

/// list_traces の検索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceQuery {
    pub run_id: RunId,
    pub tenant_id: TenantId,
}

impl TraceQuery {
    pub fn new(run_id: RunId, tenant_id: TenantId) -> Self {
        Self { run_id, tenant_id }
    }
}

/// TraceStore は decision trace を保持する外部ストア
///
/// # 設計原則
/// - 見つからない場合は `Ok(None)` / 空の Vec（エラーではない）
/// - list_traces の返却順は保証されない（Explainer 側で並べ替える）
/// - リトライ・タイムアウトはクライアント実装の責務
#[async_trait]
pub trait TraceStore: Send + Sync {
    async fn get_trace(&self, id: &TraceId) -> Result<Option<AgentDecisionTrace>, StoreError>;

    async fn list_traces(&self, query: &TraceQuery) -> Result<Vec<AgentDecisionTrace>, StoreError>;
}
