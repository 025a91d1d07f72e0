//! EntityResolver port - 生の actor ID を表示用の ID に解決
//!
//! オプショナルなコラボレータです。未設定なら entities セクションは出力されません。

use async_trait::async_trait;

use crate::domain::{ResolvedEntity, StoreError};

#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// 解決できなかった ID は結果に含めない（エラーにはしない）
    async fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedEntity>, StoreError>;
}
