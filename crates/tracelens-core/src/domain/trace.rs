//! Decision trace model: one recorded agent decision.
//!
//! Traces are created and owned by the trace store. This crate only reads
//! them; nothing here mutates a trace after it has been loaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::agent::AgentType;
use super::ids::{RunId, StepId, TraceId};

/// What the agent saw when it decided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceInputs {
    #[serde(default)]
    pub prompt: String,

    /// Documents placed in the agent's context window (issues, diffs, files, ...).
    #[serde(default)]
    pub context_window: Vec<String>,

    /// Outputs of earlier steps in the same run, oldest first.
    #[serde(default)]
    pub previous_steps: Vec<String>,
}

/// The decision itself, as the agent stated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDecision {
    pub action: String,

    #[serde(default)]
    pub reasoning: String,

    /// Trusted from the source record; expected within [0, 1].
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

/// The stored result tag of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeResult {
    Success,
    Failure,
    Pending,
    Override,
}

impl OutcomeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeResult::Success => "success",
            OutcomeResult::Failure => "failure",
            OutcomeResult::Pending => "pending",
            OutcomeResult::Override => "override",
        }
    }
}

impl fmt::Display for OutcomeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human action that superseded or annotated the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanOverride {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceOutcome {
    pub result: OutcomeResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_outcome: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_override: Option<HumanOverride>,
}

/// One recorded instance of an agent's action, inputs, reasoning and outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDecisionTrace {
    pub id: TraceId,
    pub run_id: RunId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,

    pub agent_type: AgentType,
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub inputs: TraceInputs,

    pub decision: TraceDecision,

    /// Absent while the decision has not produced a result yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TraceOutcome>,
}

impl AgentDecisionTrace {
    pub fn human_override(&self) -> Option<&HumanOverride> {
        self.outcome.as_ref()?.human_override.as_ref()
    }

    pub fn result(&self) -> Option<OutcomeResult> {
        self.outcome.as_ref().map(|o| o.result)
    }
}
