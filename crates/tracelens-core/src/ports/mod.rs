//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 外部ストア（trace store, context graph, entity resolver）と
//! 差し替え可能な解析ロジック（reasoning analyzer）へのインターフェースです。
//!
//! # 設計原則
//! - Explainer はどのストアにも書き込まない
//! - ストアの失敗（StoreError）は変換せずに呼び出し元へ伝播する

pub mod context_graph;
pub mod entity_resolver;
pub mod reasoning;
pub mod trace_store;

// 主要な trait を再エクスポート
pub use self::context_graph::ContextGraph;
pub use self::entity_resolver::EntityResolver;
pub use self::reasoning::ReasoningAnalyzer;
pub use self::trace_store::{TraceQuery, TraceStore};
