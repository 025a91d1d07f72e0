//! Resolved display identities.

use serde::{Deserialize, Serialize};

/// A raw actor identifier resolved into something displayable.
///
/// Produced by an `EntityResolver`; the explainer only attaches these to
/// explanations and never inspects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntity {
    /// The raw identifier this entity was resolved from.
    pub id: String,
    pub display_name: String,
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}
