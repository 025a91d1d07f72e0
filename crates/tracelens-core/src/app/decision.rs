//! Explanation builder: one trace in, one `DecisionExplanation` out.
//!
//! Pure and infallible. Entity resolution is async and happens in the
//! explainer; its result is passed in here already resolved.

use crate::domain::{
    AgentDecisionTrace, DecisionExplanation, DisplayStatus, ExplainedInput, ExplanationLevel,
    ExplanationLinks, InputKind, InputsSection, OutcomeSection, OverrideSection, ReasoningSection,
    ResolvedEntity,
};
use crate::ports::ReasoningAnalyzer;

use super::options::ExplainOptions;

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` characters.
///
/// Longer text keeps `max_len - 3` characters followed by `"..."`.
/// Counts characters, not bytes.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

fn limit(text: &str, limit: Option<usize>) -> String {
    match limit {
        Some(max_len) => truncate(text, max_len),
        None => text.to_string(),
    }
}

/// Classify a context-window document. First matching rule wins.
pub fn classify_input(content: &str) -> InputKind {
    if content.contains("Issue #") || content.contains("issue") {
        InputKind::Issue
    } else if content.contains("PR #") || content.contains("pull request") {
        InputKind::Pr
    } else if content.contains("```") || content.contains("function ") {
        InputKind::File
    } else {
        InputKind::Context
    }
}

fn build_inputs(trace: &AgentDecisionTrace, options: &ExplainOptions) -> InputsSection {
    let max_len = options.content_limit();
    let prompt = limit(&trace.inputs.prompt, max_len);

    if options.level == ExplanationLevel::Summary {
        return InputsSection {
            prompt,
            ..InputsSection::default()
        };
    }

    let documents = trace
        .inputs
        .context_window
        .iter()
        .map(|content| {
            let kind = classify_input(content);
            ExplainedInput {
                kind,
                description: kind.description().to_string(),
                content: limit(content, max_len),
            }
        })
        .collect();

    let previous_steps = trace
        .inputs
        .previous_steps
        .iter()
        .enumerate()
        .map(|(i, content)| ExplainedInput {
            kind: InputKind::PreviousStep,
            description: format!("Step {} output", i + 1),
            content: limit(content, max_len),
        })
        .collect();

    InputsSection {
        prompt,
        documents,
        previous_steps,
    }
}

fn build_outcome(
    trace: &AgentDecisionTrace,
    analyzer: &dyn ReasoningAnalyzer,
) -> Option<OutcomeSection> {
    let outcome = trace.outcome.as_ref()?;
    let status = DisplayStatus::from_result(outcome.result, outcome.human_override.is_some());
    let description = outcome
        .actual_outcome
        .clone()
        .unwrap_or_else(|| outcome.result.to_string());
    let artifacts = outcome
        .actual_outcome
        .as_deref()
        .map(|text| analyzer.extract_artifacts(text))
        .unwrap_or_default();

    Some(OutcomeSection {
        status,
        description,
        artifacts,
    })
}

fn build_override(trace: &AgentDecisionTrace) -> Option<OverrideSection> {
    trace.human_override().map(|o| OverrideSection {
        user_id: o.user_id.clone(),
        timestamp: o.timestamp,
        reason: o.reason.clone(),
        changes: Vec::new(),
    })
}

/// Build the explanation of a single trace.
///
/// `entities` is `Some` only when resolution was requested and a resolver
/// is configured. Links are left empty; the run aggregator fills them.
pub fn explain_trace(
    trace: &AgentDecisionTrace,
    options: &ExplainOptions,
    analyzer: &dyn ReasoningAnalyzer,
    entities: Option<Vec<ResolvedEntity>>,
) -> DecisionExplanation {
    let reasoning = ReasoningSection {
        action: trace.decision.action.clone(),
        explanation: trace.decision.reasoning.clone(),
        confidence: trace.decision.confidence,
        key_factors: analyzer.extract_key_factors(&trace.decision.reasoning),
    };

    let alternatives = match options.level {
        ExplanationLevel::Summary => Vec::new(),
        ExplanationLevel::Detailed | ExplanationLevel::Full => trace
            .decision
            .alternatives
            .iter()
            .flatten()
            .map(|alt| analyzer.parse_alternative(alt))
            .collect(),
    };

    DecisionExplanation {
        trace_id: trace.id.clone(),
        run_id: trace.run_id.clone(),
        step_id: trace.step_id.clone(),
        agent_type: trace.agent_type,
        timestamp: trace.timestamp,
        level: options.level,
        inputs: build_inputs(trace, options),
        reasoning,
        alternatives,
        outcome: build_outcome(trace, analyzer),
        override_info: build_override(trace),
        entities,
        links: ExplanationLinks::default(),
        raw: options.include_raw.then(|| trace.clone()),
    }
}
