//! StaticEntityResolver - 固定テーブルによる EntityResolver
//!
//! 本番では identity サービスが実装します。開発時は fixture から読み込みます。

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::{FixtureError, ResolvedEntity, StoreError};
use crate::ports::EntityResolver;

#[derive(Debug, Clone, Default)]
pub struct StaticEntityResolver {
    entities: HashMap<String, ResolvedEntity>,
}

impl StaticEntityResolver {
    pub fn new(entities: impl IntoIterator<Item = ResolvedEntity>) -> Self {
        Self {
            entities: entities.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let entities: Vec<ResolvedEntity> = serde_json::from_str(json)?;
        Ok(Self::new(entities))
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
}

#[async_trait]
impl EntityResolver for StaticEntityResolver {
    async fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedEntity>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.entities.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_ids_and_skips_unknown() {
        let resolver = StaticEntityResolver::from_json_str(
            r#"[{ "id": "u-1", "displayName": "Ada Lovelace", "kind": "user" }]"#,
        )
        .unwrap();

        let resolved = resolver
            .resolve(&["u-1".to_string(), "u-404".to_string()])
            .await
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].display_name, "Ada Lovelace");
    }
}
