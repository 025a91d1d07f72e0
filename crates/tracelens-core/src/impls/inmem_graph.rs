//! InMemoryContextGraph - 開発・テスト用の ContextGraph
//!
//! 各ノードは任意の親（parent）を 1 つ持ちます。
//! trajectory は root から対象ノードまでの祖先の列です。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

use crate::domain::{ContextNode, FixtureError, NodeId, StoreError, Trajectory};
use crate::ports::ContextGraph;

/// fixture の 1 レコード: node + 親ノード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNode {
    #[serde(flatten)]
    pub node: ContextNode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: HashMap<NodeId, ContextNode>,
    parents: HashMap<NodeId, NodeId>,
}

#[derive(Debug, Default)]
pub struct InMemoryContextGraph {
    state: RwLock<GraphState>,
}

impl InMemoryContextGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StoredNode>) -> Self {
        let mut state = GraphState::default();
        for record in records {
            if let Some(parent) = record.parent_id {
                state.parents.insert(record.node.id.clone(), parent);
            }
            state.nodes.insert(record.node.id.clone(), record.node);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let records: Vec<StoredNode> = serde_json::from_str(json)?;
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

    pub async fn insert(&self, node: ContextNode, parent_id: Option<NodeId>) {
        let mut state = self.state.write().await;
        match parent_id {
            Some(parent) => {
                state.parents.insert(node.id.clone(), parent);
            }
            None => {
                state.parents.remove(&node.id);
            }
        }
        state.nodes.insert(node.id.clone(), node);
    }
}

#[async_trait]
impl ContextGraph for InMemoryContextGraph {
    async fn get_trajectory(&self, node_id: &NodeId) -> Result<Trajectory, StoreError> {
        let state = self.state.read().await;

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(node_id);
        while let Some(id) = current {
            // 親の循環は最初の再訪で打ち切る
            if !visited.insert(id) {
                break;
            }
            let Some(node) = state.nodes.get(id) else {
                break;
            };
            path.push(node.clone());
            current = state.parents.get(id);
        }
        path.reverse();

        Ok(Trajectory { path })
    }
}
