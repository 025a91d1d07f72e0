//! tracelens-core
//!
//! Turns stored AI agent decision traces into structured, human-readable
//! explanations for audit and debugging.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, trace, context, explanation, run, errors）
//! - **ports**: 抽象化レイヤー（TraceStore, ContextGraph, EntityResolver, ReasoningAnalyzer）
//! - **impls**: 実装（HeuristicAnalyzer、fixture 用の in-memory ストア）
//! - **app**: アプリケーションロジック（builder, explainer, run 集約, format）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
