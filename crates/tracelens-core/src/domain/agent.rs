//! Agent roles that produce decision traces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The automated role that made a decision.
///
/// The set is closed: run-type inference matches on it by priority, so an
/// unknown role is a deserialization error rather than a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Orchestrator,
    Triage,
    Coder,
    Resolver,
    Reviewer,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::Triage => "triage",
            AgentType::Coder => "coder",
            AgentType::Resolver => "resolver",
            AgentType::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_type_serializes_lowercase() {
        let s = serde_json::to_string(&AgentType::Resolver).unwrap();
        assert_eq!(s, "\"resolver\"");
        assert_eq!(AgentType::Coder.to_string(), "coder");
    }

    #[test]
    fn unknown_agent_type_is_rejected() {
        let parsed: Result<AgentType, _> = serde_json::from_str("\"planner\"");
        assert!(parsed.is_err());
    }
}
