//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **HeuristicAnalyzer**: 正規表現ベースの ReasoningAnalyzer（デフォルト）
//! - **InMemoryTraceStore**: JSON fixture から構築できる TraceStore
//! - **InMemoryContextGraph**: 親リンクを持つ ContextGraph
//! - **StaticEntityResolver**: 固定テーブルの EntityResolver
//!
//! # 本番用実装
//! 本番のストアは外部システムです。ports の trait を実装したクライアントを
//! ExplainerBuilder に注入してください。

pub mod heuristic;
pub mod inmem_graph;
pub mod inmem_traces;
pub mod static_resolver;

// 主要な型を再エクスポート
pub use self::heuristic::HeuristicAnalyzer;
pub use self::inmem_graph::{InMemoryContextGraph, StoredNode};
pub use self::inmem_traces::{InMemoryTraceStore, StoredTrace};
pub use self::static_resolver::StaticEntityResolver;
