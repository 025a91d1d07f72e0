//! Stores - fixture ファイルから ports を組み立てる
//!
//! CLI と HTTP サーバーの両方がここで作った `Stores` を共有する。
//! ファイル未指定のストアは空になる（すべて not-found）。

use std::path::Path;
use std::sync::Arc;

use tracelens_core::app::{BuildError, Explainer, ExplainerBuilder};
use tracelens_core::domain::{FixtureError, TenantId};
use tracelens_core::impls::{InMemoryContextGraph, InMemoryTraceStore, StaticEntityResolver};
use tracelens_core::ports::{ContextGraph, EntityResolver, TraceStore};
use tracing::info;

/// 読み取り専用のコラボレータ一式
#[derive(Clone)]
pub struct Stores {
    pub traces: Arc<dyn TraceStore>,
    pub graph: Arc<dyn ContextGraph>,
    pub resolver: Option<Arc<dyn EntityResolver>>,
}

impl Stores {
    pub async fn load(
        traces: Option<&Path>,
        graph: Option<&Path>,
        entities: Option<&Path>,
    ) -> Result<Self, FixtureError> {
        let trace_store = match traces {
            Some(path) => {
                let store = InMemoryTraceStore::load_json_file(path).await?;
                info!(path = %path.display(), traces = store.len().await, "loaded trace fixture");
                store
            }
            None => InMemoryTraceStore::new(),
        };

        let graph = match graph {
            Some(path) => {
                let graph = InMemoryContextGraph::load_json_file(path).await?;
                info!(path = %path.display(), "loaded context graph fixture");
                graph
            }
            None => InMemoryContextGraph::new(),
        };

        let resolver: Option<Arc<dyn EntityResolver>> = match entities {
            Some(path) => {
                let resolver = StaticEntityResolver::load_json_file(path).await?;
                info!(path = %path.display(), "loaded entity fixture");
                Some(Arc::new(resolver))
            }
            None => None,
        };

        Ok(Self {
            traces: Arc::new(trace_store),
            graph: Arc::new(graph),
            resolver,
        })
    }

    /// テナントごとに Explainer を構築（キャッシュしない）
    pub fn explainer(&self, tenant_id: impl Into<TenantId>) -> Result<Explainer, BuildError> {
        ExplainerBuilder::new(tenant_id)
            .trace_store(self.traces.clone())
            .context_graph(self.graph.clone())
            .maybe_entity_resolver(self.resolver.clone())
            .build()
    }
}
