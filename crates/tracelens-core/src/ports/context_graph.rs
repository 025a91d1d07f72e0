//! ContextGraph port - 因果グラフストア
//!
//! 現在の trajectory は直線的な path です。分岐する原因を扱う場合は
//! node + edge の明示的な表現とトポロジカルな走査に契約を変更する必要があります。

use async_trait::async_trait;

use crate::domain::{NodeId, StoreError, Trajectory};

/// ContextGraph は中間計算ノードの因果グラフ
#[async_trait]
pub trait ContextGraph: Send + Sync {
    /// node_id に至るまでのノード列（root から node_id まで、順序付き）
    ///
    /// 未知のノードは空の path を返す。
    async fn get_trajectory(&self, node_id: &NodeId) -> Result<Trajectory, StoreError>;
}
