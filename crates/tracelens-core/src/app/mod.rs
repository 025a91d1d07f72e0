//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて説明（explanation）を組み立てます。
//!
//! # 主要コンポーネント
//! - **ExplainerBuilder**: Explainer の構築とワイヤリング
//! - **Explainer**: テナント単位の入口（decision / step / run / trajectory）
//! - **decision**: 1 トレース → DecisionExplanation（純粋関数）
//! - **run**: ソート、前後リンク、timeline、統計、要約
//! - **format**: ターミナル・監査向けのテキスト整形

pub mod builder;
pub mod decision;
pub mod explainer;
pub mod format;
pub mod options;
pub mod run;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ExplainerBuilder};
pub use self::decision::explain_trace;
pub use self::explainer::Explainer;
pub use self::format::{format_decision, format_run, format_trajectory_node};
pub use self::options::{DEFAULT_MAX_CONTENT_LENGTH, ExplainOptions};
pub use self::run::aggregate_run;
