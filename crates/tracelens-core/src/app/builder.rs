//! ExplainerBuilder - Explainer の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - グローバルなキャッシュではなく、テナントごとに明示的に構築する

use std::sync::Arc;

use crate::domain::TenantId;
use crate::impls::HeuristicAnalyzer;
use crate::ports::{ContextGraph, EntityResolver, ReasoningAnalyzer, TraceStore};

use super::explainer::Explainer;

/// ExplainerBuilder は Explainer を構築
///
/// # 使用例
/// ```ignore
/// let explainer = ExplainerBuilder::new(tenant_id)
///     .trace_store(traces)
///     .context_graph(graph)
///     .entity_resolver(resolver) // optional
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - trace store と context graph は必須
/// - analyzer は未指定なら HeuristicAnalyzer
pub struct ExplainerBuilder {
    tenant_id: TenantId,
    traces: Option<Arc<dyn TraceStore>>,
    graph: Option<Arc<dyn ContextGraph>>,
    resolver: Option<Arc<dyn EntityResolver>>,
    analyzer: Option<Arc<dyn ReasoningAnalyzer>>,
}

/// BuildError は Explainer 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("a trace store is required to build an explainer")]
    MissingTraceStore,

    #[error("a context graph is required to build an explainer")]
    MissingContextGraph,
}

impl ExplainerBuilder {
    pub fn new(tenant_id: impl Into<TenantId>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            traces: None,
            graph: None,
            resolver: None,
            analyzer: None,
        }
    }

    pub fn trace_store(mut self, traces: Arc<dyn TraceStore>) -> Self {
        self.traces = Some(traces);
        self
    }

    pub fn context_graph(mut self, graph: Arc<dyn ContextGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn entity_resolver(mut self, resolver: Arc<dyn EntityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 任意の resolver（None なら entities は常に出力されない）
    pub fn maybe_entity_resolver(mut self, resolver: Option<Arc<dyn EntityResolver>>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn analyzer(mut self, analyzer: Arc<dyn ReasoningAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn build(self) -> Result<Explainer, BuildError> {
        let traces = self.traces.ok_or(BuildError::MissingTraceStore)?;
        let graph = self.graph.ok_or(BuildError::MissingContextGraph)?;
        let analyzer = self
            .analyzer
            .unwrap_or_else(|| Arc::new(HeuristicAnalyzer::new()));

        Ok(Explainer::new(
            self.tenant_id,
            traces,
            graph,
            self.resolver,
            analyzer,
        ))
    }
}
