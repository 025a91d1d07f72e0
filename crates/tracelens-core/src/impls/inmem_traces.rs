//! InMemoryTraceStore - 開発・テスト用の TraceStore
//!
//! # 実装詳細
//! - tenant ごとのトレースを Vec で保持（挿入順）
//! - tokio の RwLock で排他制御（Explainer からは読み取りのみ）
//! - JSON fixture（`[{ "tenantId": ..., <trace fields> }]`）から構築できる

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;

use crate::domain::{AgentDecisionTrace, FixtureError, StoreError, TenantId, TraceId};
use crate::ports::{TraceQuery, TraceStore};

/// fixture の 1 レコード: tenant + trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrace {
    pub tenant_id: TenantId,
    #[serde(flatten)]
    pub trace: AgentDecisionTrace,
}

/// InMemoryTraceStore は開発用の TraceStore
///
/// # 使用例
/// ```ignore
/// let store = InMemoryTraceStore::load_json_file("traces.json").await?;
/// let traces = store.list_traces(&TraceQuery::new(run_id, tenant_id)).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTraceStore {
    records: RwLock<Vec<StoredTrace>>,
}

impl InMemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StoredTrace>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let records: Vec<StoredTrace> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub async fn load_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    pub async fn insert(&self, tenant_id: TenantId, trace: AgentDecisionTrace) {
        self.records
            .write()
            .await
            .push(StoredTrace { tenant_id, trace });
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TraceStore for InMemoryTraceStore {
    async fn get_trace(&self, id: &TraceId) -> Result<Option<AgentDecisionTrace>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| &r.trace.id == id)
            .map(|r| r.trace.clone()))
    }

    async fn list_traces(&self, query: &TraceQuery) -> Result<Vec<AgentDecisionTrace>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.tenant_id == query.tenant_id && r.trace.run_id == query.run_id)
            .map(|r| r.trace.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunId;

    const FIXTURE: &str = r#"[
        {
            "tenantId": "acme",
            "id": "tr-1",
            "runId": "run-1",
            "agentType": "triage",
            "timestamp": "2024-05-01T10:00:00Z",
            "decision": { "action": "label", "confidence": 0.7 }
        },
        {
            "tenantId": "globex",
            "id": "tr-2",
            "runId": "run-1",
            "agentType": "coder",
            "timestamp": "2024-05-01T10:01:00Z",
            "decision": { "action": "patch", "confidence": 0.9 }
        }
    ]"#;

    #[tokio::test]
    async fn list_traces_filters_by_tenant_and_run() {
        let store = InMemoryTraceStore::from_json_str(FIXTURE).unwrap();
        assert_eq!(store.len().await, 2);

        let acme = store
            .list_traces(&TraceQuery::new(RunId::new("run-1"), TenantId::new("acme")))
            .await
            .unwrap();
        assert_eq!(acme.len(), 1);
        assert_eq!(acme[0].id, TraceId::new("tr-1"));

        let other_run = store
            .list_traces(&TraceQuery::new(RunId::new("run-2"), TenantId::new("acme")))
            .await
            .unwrap();
        assert!(other_run.is_empty());
    }

    #[tokio::test]
    async fn get_trace_is_a_point_lookup() {
        let store = InMemoryTraceStore::from_json_str(FIXTURE).unwrap();

        let found = store.get_trace(&TraceId::new("tr-2")).await.unwrap();
        assert_eq!(found.map(|t| t.decision.action), Some("patch".to_string()));

        let missing = store.get_trace(&TraceId::new("nope")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn insert_appends_records() {
        let store = InMemoryTraceStore::from_json_str(FIXTURE).unwrap();
        let mut trace = store
            .get_trace(&TraceId::new("tr-1"))
            .await
            .unwrap()
            .unwrap();
        trace.id = TraceId::new("tr-3");
        store.insert(TenantId::new("acme"), trace).await;

        let acme = store
            .list_traces(&TraceQuery::new(RunId::new("run-1"), TenantId::new("acme")))
            .await
            .unwrap();
        assert_eq!(acme.len(), 2);
    }

    #[test]
    fn invalid_fixture_is_an_error() {
        let result = InMemoryTraceStore::from_json_str("{\"not\": \"a list\"}");
        assert!(matches!(result, Err(FixtureError::Json(_))));
    }

    #[tokio::test]
    async fn missing_file_reports_its_path() {
        let result = InMemoryTraceStore::load_json_file("/definitely/not/here.json").await;
        match result {
            Err(FixtureError::Io { path, .. }) => assert_eq!(path, "/definitely/not/here.json"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
