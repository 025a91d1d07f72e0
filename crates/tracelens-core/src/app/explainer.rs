//! Explainer - tenant-scoped entry point for decision explanations.
//!
//! # フロー
//! - decision: TraceStore::get_trace → explain_trace
//! - run: TraceStore::list_traces（1 回だけ）→ sort → explain_trace × N → aggregate_run
//! - step: TraceStore::list_traces（1 回だけ）→ sort → chain_links → 該当トレースだけ explain_trace
//! - trajectory: ContextGraph::get_trajectory → format_trajectory_node
//!
//! 見つからない場合は `Ok(None)`。ストアの失敗はそのまま返す。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{
    AgentDecisionTrace, DecisionExplanation, NodeId, ResolvedEntity, RunExplanation, RunId,
    StepId, StoreError, TenantId, TraceId,
};
use crate::ports::{ContextGraph, EntityResolver, ReasoningAnalyzer, TraceQuery, TraceStore};

use super::decision::explain_trace;
use super::format::format_trajectory_node;
use super::options::ExplainOptions;
use super::run::{aggregate_run, chain_links, sort_chronologically};

/// Explainer は 1 テナント分のコラボレータを保持する
///
/// 内部に可変状態はなく、呼び出しごとにストアの現在の内容から説明を組み立てる。
/// `ExplainerBuilder` で構築する。
pub struct Explainer {
    tenant_id: TenantId,
    traces: Arc<dyn TraceStore>,
    graph: Arc<dyn ContextGraph>,
    resolver: Option<Arc<dyn EntityResolver>>,
    analyzer: Arc<dyn ReasoningAnalyzer>,
}

impl Explainer {
    pub(crate) fn new(
        tenant_id: TenantId,
        traces: Arc<dyn TraceStore>,
        graph: Arc<dyn ContextGraph>,
        resolver: Option<Arc<dyn EntityResolver>>,
        analyzer: Arc<dyn ReasoningAnalyzer>,
    ) -> Self {
        Self {
            tenant_id,
            traces,
            graph,
            resolver,
            analyzer,
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    async fn resolve_entities(
        &self,
        trace: &AgentDecisionTrace,
        options: &ExplainOptions,
    ) -> Result<Option<Vec<ResolvedEntity>>, StoreError> {
        let Some(resolver) = self.resolver.as_ref().filter(|_| options.resolve_entities) else {
            return Ok(None);
        };
        let ids: Vec<String> = trace
            .human_override()
            .map(|o| o.user_id.clone())
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Some(Vec::new()));
        }
        resolver.resolve(&ids).await.map(Some)
    }

    async fn explain_one(
        &self,
        trace: &AgentDecisionTrace,
        options: &ExplainOptions,
    ) -> Result<DecisionExplanation, StoreError> {
        let entities = self.resolve_entities(trace, options).await?;
        Ok(explain_trace(trace, options, self.analyzer.as_ref(), entities))
    }

    /// Explain a single decision by trace id.
    #[instrument(skip(self, options), fields(tenant = %self.tenant_id))]
    pub async fn explain_decision(
        &self,
        trace_id: &TraceId,
        options: &ExplainOptions,
    ) -> Result<Option<DecisionExplanation>, StoreError> {
        let Some(trace) = self.traces.get_trace(trace_id).await? else {
            debug!("trace not found");
            return Ok(None);
        };
        self.explain_one(&trace, options).await.map(Some)
    }

    /// Explain a whole run: sorted, cross-linked decisions plus timeline,
    /// statistics, status and summary.
    #[instrument(skip(self, options), fields(tenant = %self.tenant_id))]
    pub async fn explain_run(
        &self,
        run_id: &RunId,
        options: &ExplainOptions,
    ) -> Result<Option<RunExplanation>, StoreError> {
        let query = TraceQuery::new(run_id.clone(), self.tenant_id.clone());
        let mut traces = self.traces.list_traces(&query).await?;
        if traces.is_empty() {
            debug!("run has no traces");
            return Ok(None);
        }
        sort_chronologically(&mut traces);

        let mut decisions = Vec::with_capacity(traces.len());
        for trace in &traces {
            decisions.push(self.explain_one(trace, options).await?);
        }

        let run = aggregate_run(run_id.clone(), self.tenant_id.clone(), &traces, decisions);
        debug!(
            decisions = run.stats.total_decisions,
            status = %run.outcome.status,
            "run explained"
        );
        Ok(Some(run))
    }

    /// Explain one step of a run, with its chain links.
    ///
    /// Links come from the whole sorted run, but only the matching trace is
    /// explained (and has its entities resolved).
    #[instrument(skip(self, options), fields(tenant = %self.tenant_id))]
    pub async fn explain_step(
        &self,
        run_id: &RunId,
        step_id: &StepId,
        options: &ExplainOptions,
    ) -> Result<Option<DecisionExplanation>, StoreError> {
        let query = TraceQuery::new(run_id.clone(), self.tenant_id.clone());
        let mut traces = self.traces.list_traces(&query).await?;
        sort_chronologically(&mut traces);

        let Some(index) = traces
            .iter()
            .position(|t| t.step_id.as_ref() == Some(step_id))
        else {
            debug!(traces = traces.len(), "step not found in run");
            return Ok(None);
        };

        let mut decision = self.explain_one(&traces[index], options).await?;
        decision.links = chain_links(&traces).swap_remove(index);
        Ok(Some(decision))
    }

    /// Human-readable lines for the causal path leading to `node_id`.
    #[instrument(skip(self), fields(tenant = %self.tenant_id))]
    pub async fn explain_trajectory(&self, node_id: &NodeId) -> Result<Vec<String>, StoreError> {
        let trajectory = self.graph.get_trajectory(node_id).await?;
        Ok(trajectory.path.iter().map(format_trajectory_node).collect())
    }
}
