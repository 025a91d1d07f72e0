//! Domain model (ids, traces, context nodes, explanations, errors).
//!
//! - 入力: agent, trace, context, entity（外部ストアが所有、読み取り専用）
//! - 出力: explanation, run（リクエストごとに生成される派生値）

pub mod agent;
pub mod context;
pub mod entity;
pub mod errors;
pub mod explanation;
pub mod ids;
pub mod run;
pub mod trace;

pub use agent::AgentType;
pub use context::{ContextNode, Trajectory};
pub use entity::ResolvedEntity;
pub use errors::{FixtureError, StoreError};
pub use explanation::{
    Alternative, DecisionExplanation, DisplayStatus, ExplainedInput, ExplanationLevel,
    ExplanationLinks, InputKind, InputsSection, OutcomeSection, OverrideSection,
    ParseLevelError, ReasoningSection,
};
pub use ids::{NodeId, RunId, StepId, TenantId, TraceId};
pub use run::{
    RunExplanation, RunOutcome, RunStats, RunStatus, RunType, TimelineActor, TimelineEntry,
};
pub use trace::{
    AgentDecisionTrace, HumanOverride, OutcomeResult, TraceDecision, TraceInputs, TraceOutcome,
};
