//! Domain identifiers (strongly-typed IDs).
//!
//! トレースやノードの ID は外部ストアが採番するため、中身は不透明な文字列です。
//! Phantom type パターンで `TraceId` と `RunId` などを型レベルで区別します。
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// ログやエラーメッセージで使う種別名（例: "trace", "run"）
    fn kind() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let run: RunId = Id::new("run-42");
/// let trace: TraceId = Id::new("run-42");
/// // run と trace は異なる型なので、混同できない
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::kind(), self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Decision trace のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trace {}

impl IdMarker for Trace {
    fn kind() -> &'static str {
        "trace"
    }
}

/// Run のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Run {}

impl IdMarker for Run {
    fn kind() -> &'static str {
        "run"
    }
}

/// Step のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {}

impl IdMarker for Step {
    fn kind() -> &'static str {
        "step"
    }
}

/// Tenant のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tenant {}

impl IdMarker for Tenant {
    fn kind() -> &'static str {
        "tenant"
    }
}

/// Context graph node のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {}

impl IdMarker for Node {
    fn kind() -> &'static str {
        "node"
    }
}

// ========================================
// Type Alias（使いやすさのため）
// ========================================

/// Identifier of one recorded agent decision.
pub type TraceId = Id<Trace>;

/// Identifier of one end-to-end workflow execution.
pub type RunId = Id<Run>;

/// Identifier of a position within a run.
pub type StepId = Id<Step>;

/// Identifier of the tenant that owns a run.
pub type TenantId = Id<Tenant>;

/// Identifier of a node in the context graph.
pub type NodeId = Id<Node>;
