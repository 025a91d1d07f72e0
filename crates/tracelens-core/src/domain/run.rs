//! Run explanation model: the aggregated view of every decision in a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::agent::AgentType;
use super::explanation::DecisionExplanation;
use super::ids::{RunId, TenantId, TraceId};
use super::trace::OutcomeResult;

/// What kind of workflow a run was, inferred from the agents involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunType {
    ConflictResolution,
    CodeGeneration,
    Review,
    Triage,
    Unknown,
}

impl RunType {
    /// Priority order: resolver > coder > reviewer > triage.
    pub fn infer(agents: &[AgentType]) -> Self {
        let has = |agent: AgentType| agents.contains(&agent);
        if has(AgentType::Resolver) {
            RunType::ConflictResolution
        } else if has(AgentType::Coder) {
            RunType::CodeGeneration
        } else if has(AgentType::Reviewer) {
            RunType::Review
        } else if has(AgentType::Triage) {
            RunType::Triage
        } else {
            RunType::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunType::ConflictResolution => "conflict-resolution",
            RunType::CodeGeneration => "code-generation",
            RunType::Review => "review",
            RunType::Triage => "triage",
            RunType::Unknown => "unknown",
        }
    }

    /// Capitalized label used at the start of a run summary.
    pub fn label(&self) -> &'static str {
        match self {
            RunType::ConflictResolution => "Conflict-resolution",
            RunType::CodeGeneration => "Code-generation",
            RunType::Review => "Review",
            RunType::Triage => "Triage",
            RunType::Unknown => "Unclassified",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
    Pending,
}

impl RunStatus {
    /// Infer the run status from each decision's stored result
    /// (`None` = the decision has no outcome yet).
    ///
    /// Precedence: any failure, then any missing outcome, then success.
    /// A human override that reverses a failed decision does not change the
    /// verdict; that rule is awaiting product confirmation.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Option<OutcomeResult>>,
    {
        let mut missing = false;
        for result in results {
            match result {
                Some(OutcomeResult::Failure) => return RunStatus::Failure,
                None => missing = true,
                Some(_) => {}
            }
        }
        if missing {
            RunStatus::Pending
        } else {
            RunStatus::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
            RunStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub status: RunStatus,
    pub description: String,
    pub artifacts: Vec<String>,
}

/// Who produced a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineActor {
    Ai,
    Human,
}

impl TimelineActor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineActor::Ai => "ai",
            TimelineActor::Human => "human",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub actor: TimelineActor,
    pub trace_id: TraceId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total_decisions: usize,
    pub human_overrides: usize,
    pub average_confidence: f64,
    pub duration_ms: i64,
}

/// Structured explanation of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunExplanation {
    pub run_id: RunId,
    pub run_type: RunType,
    pub tenant_id: TenantId,
    pub summary: String,

    /// Sorted by timestamp and cross-linked through `links`.
    pub decisions: Vec<DecisionExplanation>,

    pub outcome: RunOutcome,

    /// Sorted by timestamp regardless of actor.
    pub timeline: Vec<TimelineEntry>,

    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::resolver_wins(&[AgentType::Triage, AgentType::Coder, AgentType::Resolver], RunType::ConflictResolution)]
    #[case::coder_over_reviewer(&[AgentType::Reviewer, AgentType::Coder], RunType::CodeGeneration)]
    #[case::reviewer(&[AgentType::Orchestrator, AgentType::Reviewer], RunType::Review)]
    #[case::triage(&[AgentType::Triage], RunType::Triage)]
    #[case::orchestrator_only(&[AgentType::Orchestrator], RunType::Unknown)]
    #[case::empty(&[], RunType::Unknown)]
    fn run_type_follows_priority(#[case] agents: &[AgentType], #[case] expected: RunType) {
        assert_eq!(RunType::infer(agents), expected);
    }

    #[test]
    fn any_failure_fails_the_run() {
        let status = RunStatus::from_results([
            Some(OutcomeResult::Success),
            None,
            Some(OutcomeResult::Failure),
            Some(OutcomeResult::Override),
        ]);
        assert_eq!(status, RunStatus::Failure);
    }

    #[test]
    fn missing_outcome_makes_the_run_pending() {
        let status = RunStatus::from_results([Some(OutcomeResult::Success), None]);
        assert_eq!(status, RunStatus::Pending);
    }

    #[rstest]
    #[case::success(OutcomeResult::Success)]
    #[case::pending_tag(OutcomeResult::Pending)]
    #[case::override_tag(OutcomeResult::Override)]
    fn recorded_non_failures_make_the_run_succeed(#[case] result: OutcomeResult) {
        let status = RunStatus::from_results([Some(OutcomeResult::Success), Some(result)]);
        assert_eq!(status, RunStatus::Success);
    }

    #[test]
    fn run_type_serializes_kebab_case() {
        let s = serde_json::to_string(&RunType::ConflictResolution).unwrap();
        assert_eq!(s, "\"conflict-resolution\"");
    }
}
