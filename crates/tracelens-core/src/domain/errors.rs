//! Errors - エラー型
//!
//! - `StoreError`: 外部ポート（trace store / context graph / entity resolver）の失敗。
//!   Explainer は捕捉もリトライもせず、そのまま呼び出し元に返す。
//! - `FixtureError`: JSON fixture からの in-memory ストア構築の失敗。
//!
//! 「見つからない」はエラーではなく `Ok(None)` で表現します。

use thiserror::Error;

/// StoreError は外部コラボレータの失敗
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("store backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }
}

/// FixtureError は fixture ファイル読み込みの失敗
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}
