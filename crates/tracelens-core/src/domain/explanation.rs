//! Decision explanation model: the audit-readable view of one trace.
//!
//! Explanations are derived values. They are rebuilt on every request and
//! never written back to any store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::agent::AgentType;
use super::entity::ResolvedEntity;
use super::ids::{RunId, StepId, TraceId};
use super::trace::{AgentDecisionTrace, OutcomeResult};

/// How much of a trace an explanation carries.
///
/// - `summary`: prompt, reasoning and outcome only.
/// - `detailed`: every section, with content truncation.
/// - `full`: every section, without content truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationLevel {
    Summary,
    #[default]
    Detailed,
    Full,
}

impl ExplanationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationLevel::Summary => "summary",
            ExplanationLevel::Detailed => "detailed",
            ExplanationLevel::Full => "full",
        }
    }
}

impl fmt::Display for ExplanationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown explanation level '{0}' (expected summary, detailed or full)")]
pub struct ParseLevelError(String);

impl FromStr for ExplanationLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" => Ok(ExplanationLevel::Summary),
            "detailed" => Ok(ExplanationLevel::Detailed),
            "full" => Ok(ExplanationLevel::Full),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Classification of an input the agent saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    Issue,
    Pr,
    File,
    Context,
    PreviousStep,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Issue => "issue",
            InputKind::Pr => "pr",
            InputKind::File => "file",
            InputKind::Context => "context",
            InputKind::PreviousStep => "previous-step",
        }
    }

    /// Fixed description for context-window documents.
    pub fn description(&self) -> &'static str {
        match self {
            InputKind::Issue => "Issue context",
            InputKind::Pr => "Pull request context",
            InputKind::File => "Source file",
            InputKind::Context => "Additional context",
            InputKind::PreviousStep => "Previous step output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainedInput {
    pub kind: InputKind,
    pub description: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputsSection {
    pub prompt: String,
    pub documents: Vec<ExplainedInput>,
    pub previous_steps: Vec<ExplainedInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningSection {
    pub action: String,
    pub explanation: String,
    pub confidence: f64,
    pub key_factors: Vec<String>,
}

/// An option the agent considered and did not take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub action: String,
    pub rejection_reason: String,
}

impl Alternative {
    pub fn new(action: impl Into<String>, rejection_reason: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            rejection_reason: rejection_reason.into(),
        }
    }
}

/// Decision-level status as shown to a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Success,
    Failure,
    Pending,
    Overridden,
}

impl DisplayStatus {
    /// A human override wins over whatever result tag was stored.
    pub fn from_result(result: OutcomeResult, overridden: bool) -> Self {
        if overridden {
            return DisplayStatus::Overridden;
        }
        match result {
            OutcomeResult::Success => DisplayStatus::Success,
            OutcomeResult::Failure => DisplayStatus::Failure,
            OutcomeResult::Pending => DisplayStatus::Pending,
            OutcomeResult::Override => DisplayStatus::Overridden,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Success => "success",
            DisplayStatus::Failure => "failure",
            DisplayStatus::Pending => "pending",
            DisplayStatus::Overridden => "overridden",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSection {
    pub status: DisplayStatus,
    pub description: String,
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSection {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Always empty: a trace does not record what the human changed.
    pub changes: Vec<String>,
}

/// Position of a decision within its run chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_step: Option<TraceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<TraceId>,

    pub related: Vec<TraceId>,
}

/// Structured explanation of a single decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionExplanation {
    pub trace_id: TraceId,
    pub run_id: RunId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,

    pub agent_type: AgentType,
    pub timestamp: DateTime<Utc>,
    pub level: ExplanationLevel,

    pub inputs: InputsSection,
    pub reasoning: ReasoningSection,
    pub alternatives: Vec<Alternative>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeSection>,

    #[serde(rename = "override", default, skip_serializing_if = "Option::is_none")]
    pub override_info: Option<OverrideSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<ResolvedEntity>>,

    pub links: ExplanationLinks,

    /// Verbatim source record, only when the caller asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<AgentDecisionTrace>,
}

impl DecisionExplanation {
    pub fn artifacts(&self) -> &[String] {
        self.outcome
            .as_ref()
            .map(|o| o.artifacts.as_slice())
            .unwrap_or_default()
    }
}
