//! Context graph nodes, as returned by the graph store's trajectory query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// One intermediate computation node. `data` is opaque to the explainer
/// apart from the optional `action` / `agentType` string fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextNode {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub data: serde_json::Value,
}

impl ContextNode {
    fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.data_str("action")
    }

    pub fn agent_type(&self) -> Option<&str> {
        self.data_str("agentType")
    }
}

/// The ordered path of nodes leading to (and ending at) a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub path: Vec<ContextNode>,
}
