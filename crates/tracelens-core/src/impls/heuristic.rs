//! HeuristicAnalyzer - 正規表現ベースの ReasoningAnalyzer
//!
//! # 抽出ルール
//! - key factors: 因果の接続詞（because / since / due to / as / given that）に続く節と、
//!   箇条書き（`-` / `•`）の項目
//! - alternatives: `(rejected: ...)` → `- rejected because ...` → `action: reason` の順に試す
//! - artifacts: URL と `created|modified|updated <token>`

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::Alternative;
use crate::ports::ReasoningAnalyzer;

/// Upper bound on extracted key factors per decision.
pub const MAX_KEY_FACTORS: usize = 5;

/// Rejection reason used when an alternative has no recognizable structure.
pub const NOT_SELECTED: &str = "Not selected";

static CAUSAL_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:because|since|due\s+to|given\s+that|as)\s+([^.,;!?\n]+)")
        .expect("valid causal clause regex")
});

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\s)[-•]\s+([^\n]+)").expect("valid bullet regex")
});

static REJECTED_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s*\(rejected:\s*(.*?)\)\s*$").expect("valid rejected regex")
});

static REJECTED_BECAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s+-\s+rejected because\s+(.+?)\s*$")
        .expect("valid rejected-because regex")
});

static ACTION_REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:]+?)\s*:\s+(.+?)\s*$").expect("valid action-reason regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()"']+"#).expect("valid url regex"));

static CHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:created|modified|updated)\s+(\S+)").expect("valid change regex")
});

fn trim_trailing_punctuation(token: &str) -> &str {
    token.trim_end_matches(['.', ',', ';', ':', ')'])
}

/// HeuristicAnalyzer は状態を持たない
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl ReasoningAnalyzer for HeuristicAnalyzer {
    fn extract_key_factors(&self, reasoning: &str) -> Vec<String> {
        // (位置, テキスト) を集めて出現順に並べる
        let mut found: Vec<(usize, &str)> = Vec::new();
        for re in [&*CAUSAL_CLAUSE_RE, &*BULLET_RE] {
            for caps in re.captures_iter(reasoning) {
                if let Some(m) = caps.get(1) {
                    found.push((m.start(), m.as_str().trim()));
                }
            }
        }
        found.sort_by_key(|(pos, _)| *pos);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .map(|(_, text)| text)
            .filter(|text| !text.is_empty() && seen.insert(*text))
            .take(MAX_KEY_FACTORS)
            .map(str::to_string)
            .collect()
    }

    fn parse_alternative(&self, alternative: &str) -> Alternative {
        for re in [&*REJECTED_PAREN_RE, &*REJECTED_BECAUSE_RE, &*ACTION_REASON_RE] {
            if let Some(caps) = re.captures(alternative) {
                return Alternative::new(caps[1].trim(), caps[2].trim());
            }
        }
        Alternative::new(alternative.trim(), NOT_SELECTED)
    }

    fn extract_artifacts(&self, outcome: &str) -> Vec<String> {
        let mut found: Vec<(usize, u8, &str)> = Vec::new();
        for m in URL_RE.find_iter(outcome) {
            found.push((m.start(), 0, trim_trailing_punctuation(m.as_str())));
        }
        for caps in CHANGE_RE.captures_iter(outcome) {
            if let Some(m) = caps.get(1) {
                found.push((m.start(), 1, trim_trailing_punctuation(m.as_str())));
            }
        }
        found.sort_by_key(|(pos, order, _)| (*pos, *order));

        found
            .into_iter()
            .filter(|(_, _, token)| !token.is_empty())
            .map(|(_, _, token)| token.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn extracts_causal_clause_and_bullet() {
        let factors = HeuristicAnalyzer
            .extract_key_factors("Rejected because it was too risky. - Consider rollback");
        assert_eq!(factors, vec!["it was too risky", "Consider rollback"]);
    }

    #[test]
    fn key_factors_keep_first_appearance_order_and_dedup() {
        let reasoning = "- cache is cold\nPicked retry since tests are flaky.\n• cache is cold\nAlso due to quota limits";
        let factors = HeuristicAnalyzer.extract_key_factors(reasoning);
        assert_eq!(
            factors,
            vec!["cache is cold", "tests are flaky", "quota limits"]
        );
    }

    #[test]
    fn key_factors_are_capped() {
        let reasoning = "- a\n- b\n- c\n- d\n- e\n- f\n- g";
        let factors = HeuristicAnalyzer.extract_key_factors(reasoning);
        assert_eq!(factors.len(), MAX_KEY_FACTORS);
        assert_eq!(factors[0], "a");
        assert_eq!(factors[4], "e");
    }

    #[test]
    fn connectives_are_case_insensitive_whole_words() {
        let factors = HeuristicAnalyzer
            .extract_key_factors("Given that the branch is stale, rebase. The basis was fine");
        assert_eq!(factors, vec!["the branch is stale"]);
    }

    #[test]
    fn hyphenated_words_are_not_bullets() {
        let factors = HeuristicAnalyzer.extract_key_factors("Use a read-only token");
        assert!(factors.is_empty());
    }

    #[rstest]
    #[case::paren("Force push (rejected: rewrites history)", "Force push", "rewrites history")]
    #[case::because("Revert - rejected because it loses work", "Revert", "it loses work")]
    #[case::generic("Manual merge: too slow", "Manual merge", "too slow")]
    #[case::paren_before_generic("Skip: later (rejected: blocks release)", "Skip: later", "blocks release")]
    #[case::unstructured("Do nothing", "Do nothing", NOT_SELECTED)]
    #[case::url_is_not_generic("Open https://example.com", "Open https://example.com", NOT_SELECTED)]
    fn parses_alternatives(#[case] input: &str, #[case] action: &str, #[case] reason: &str) {
        let alt = HeuristicAnalyzer.parse_alternative(input);
        assert_eq!(alt, Alternative::new(action, reason));
    }

    #[test]
    fn extracts_urls_and_changed_targets_in_order() {
        let artifacts = HeuristicAnalyzer.extract_artifacts(
            "Created src/lib.rs, then opened https://github.com/acme/repo/pull/7. Updated README.md.",
        );
        assert_eq!(
            artifacts,
            vec![
                "src/lib.rs",
                "https://github.com/acme/repo/pull/7",
                "README.md"
            ]
        );
    }

    #[test]
    fn artifacts_keep_duplicates_within_one_text() {
        let artifacts =
            HeuristicAnalyzer.extract_artifacts("modified a.rs and later modified a.rs again");
        assert_eq!(artifacts, vec!["a.rs", "a.rs"]);
    }

    #[test]
    fn text_without_artifacts_yields_nothing() {
        assert!(HeuristicAnalyzer.extract_artifacts("nothing happened").is_empty());
    }
}
