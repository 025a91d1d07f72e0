//! ReasoningAnalyzer port - 自由記述テキストからの抽出
//!
//! 現在はヒューリスティック実装（`impls::heuristic::HeuristicAnalyzer`）のみ。
//! 将来、モデルベースの analyzer に差し替えても Explanation Builder の契約は変わらない。

use crate::domain::Alternative;

/// ReasoningAnalyzer は decision の文章を構造化する
///
/// # 設計原則
/// - 純粋関数（副作用なし、状態なし）
/// - 失敗しない（抽出できなければ空の結果）
pub trait ReasoningAnalyzer: Send + Sync {
    /// reasoning から判断の要因を最大 5 件抽出
    fn extract_key_factors(&self, reasoning: &str) -> Vec<String>;

    /// 採用されなかった選択肢の記述を (action, 却下理由) に分解
    fn parse_alternative(&self, alternative: &str) -> Alternative;

    /// 実際の結果の記述から成果物（URL、作成・変更されたもの）を抽出
    fn extract_artifacts(&self, outcome: &str) -> Vec<String>;
}
