//! Text formatters for terminal and audit output.
//!
//! Pure functions over already-built explanations. Nothing here feeds back
//! into explanation logic.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{ContextNode, DecisionExplanation, RunExplanation};

const INDENT: &str = "  ";

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn seconds(ms: i64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

/// Render one decision as INPUTS / REASONING / ALTERNATIVES / OUTCOME / OVERRIDE.
pub fn format_decision(explanation: &DecisionExplanation) -> String {
    let mut lines = Vec::new();

    let mut header = format!(
        "Decision {} by {} agent at {} (run {}",
        explanation.trace_id,
        explanation.agent_type,
        timestamp(&explanation.timestamp),
        explanation.run_id
    );
    if let Some(step) = &explanation.step_id {
        header.push_str(&format!(", step {step}"));
    }
    header.push(')');
    lines.push(header);

    let links = &explanation.links;
    if links.previous_step.is_some() || links.next_step.is_some() {
        let prev = links.previous_step.as_ref().map_or("-", |id| id.as_str());
        let next = links.next_step.as_ref().map_or("-", |id| id.as_str());
        lines.push(format!("Previous: {prev} | Next: {next}"));
    }

    lines.push(String::new());
    lines.push("INPUTS".to_string());
    lines.push(format!("{INDENT}Prompt: {}", explanation.inputs.prompt));
    for input in explanation
        .inputs
        .documents
        .iter()
        .chain(&explanation.inputs.previous_steps)
    {
        lines.push(format!(
            "{INDENT}[{}] {}: {}",
            input.kind.as_str(),
            input.description,
            input.content
        ));
    }

    let reasoning = &explanation.reasoning;
    lines.push(String::new());
    lines.push("REASONING".to_string());
    lines.push(format!("{INDENT}Action: {}", reasoning.action));
    lines.push(format!("{INDENT}Confidence: {}", percent(reasoning.confidence)));
    if !reasoning.explanation.is_empty() {
        lines.push(format!("{INDENT}Explanation: {}", reasoning.explanation));
    }
    if !reasoning.key_factors.is_empty() {
        lines.push(format!("{INDENT}Key factors:"));
        for factor in &reasoning.key_factors {
            lines.push(format!("{INDENT}{INDENT}- {factor}"));
        }
    }

    if !explanation.alternatives.is_empty() {
        lines.push(String::new());
        lines.push("ALTERNATIVES".to_string());
        for alt in &explanation.alternatives {
            lines.push(format!("{INDENT}- {}: {}", alt.action, alt.rejection_reason));
        }
    }

    if let Some(outcome) = &explanation.outcome {
        lines.push(String::new());
        lines.push("OUTCOME".to_string());
        lines.push(format!("{INDENT}Status: {}", outcome.status));
        lines.push(format!("{INDENT}Description: {}", outcome.description));
        if !outcome.artifacts.is_empty() {
            lines.push(format!("{INDENT}Artifacts: {}", outcome.artifacts.join(", ")));
        }
    }

    if let Some(o) = &explanation.override_info {
        lines.push(String::new());
        lines.push("OVERRIDE".to_string());
        lines.push(format!("{INDENT}By: {} at {}", o.user_id, timestamp(&o.timestamp)));
        if let Some(reason) = &o.reason {
            lines.push(format!("{INDENT}Reason: {reason}"));
        }
    }

    if let Some(entities) = explanation.entities.as_ref().filter(|e| !e.is_empty()) {
        lines.push(String::new());
        lines.push("ENTITIES".to_string());
        for entity in entities {
            lines.push(format!(
                "{INDENT}{} ({}): {}",
                entity.id, entity.kind, entity.display_name
            ));
        }
    }

    lines.join("\n")
}

/// Render a run as TIMELINE / STATISTICS / OUTCOME.
pub fn format_run(run: &RunExplanation) -> String {
    let mut lines = vec![
        format!("Run {} ({}) for tenant {}", run.run_id, run.run_type, run.tenant_id),
        run.summary.clone(),
        String::new(),
        "TIMELINE".to_string(),
    ];

    for entry in &run.timeline {
        lines.push(format!(
            "{INDENT}{} [{}] {} ({})",
            timestamp(&entry.timestamp),
            entry.actor.as_str(),
            entry.event,
            entry.trace_id
        ));
    }

    lines.push(String::new());
    lines.push("STATISTICS".to_string());
    lines.push(format!("{INDENT}Total decisions: {}", run.stats.total_decisions));
    lines.push(format!("{INDENT}Human overrides: {}", run.stats.human_overrides));
    lines.push(format!(
        "{INDENT}Average confidence: {}",
        percent(run.stats.average_confidence)
    ));
    lines.push(format!("{INDENT}Duration: {}", seconds(run.stats.duration_ms)));

    lines.push(String::new());
    lines.push("OUTCOME".to_string());
    lines.push(format!("{INDENT}Status: {}", run.outcome.status));
    lines.push(format!("{INDENT}Description: {}", run.outcome.description));
    if !run.outcome.artifacts.is_empty() {
        lines.push(format!("{INDENT}Artifacts: {}", run.outcome.artifacts.join(", ")));
    }

    lines.join("\n")
}

/// One trajectory line: `<ts> [<type>] <agentType>: <action>`.
pub fn format_trajectory_node(node: &ContextNode) -> String {
    let head = format!("{} [{}]", timestamp(&node.timestamp), node.node_type);
    match (node.agent_type(), node.action()) {
        (Some(agent), Some(action)) => format!("{head} {agent}: {action}"),
        (None, Some(action)) => format!("{head} {action}"),
        (Some(agent), None) => format!("{head} {agent}"),
        (None, None) => head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::decision::explain_trace;
    use crate::app::decision::fixtures::{at, trace, with_override};
    use crate::app::options::ExplainOptions;
    use crate::app::run::{aggregate_run, sort_chronologically};
    use crate::domain::{AgentType, NodeId, OutcomeResult, RunId, TenantId, TraceOutcome};
    use crate::impls::HeuristicAnalyzer;
    use rstest::rstest;

    #[test]
    fn decision_text_has_sections_in_order() {
        let mut t = with_override(trace("a", AgentType::Coder, 0), "u-1", 5);
        t.inputs.context_window = vec!["Issue #3 login fails".to_string()];
        t.decision.reasoning = "Patched because the token expired".to_string();
        t.decision.alternatives = Some(vec!["Revert: loses the fix".to_string()]);
        if let Some(outcome) = t.outcome.as_mut() {
            outcome.actual_outcome = Some("modified auth.rs".to_string());
        }

        let text = format_decision(&explain_trace(
            &t,
            &ExplainOptions::default(),
            &HeuristicAnalyzer,
            None,
        ));

        let order: Vec<usize> = ["INPUTS", "REASONING", "ALTERNATIVES", "OUTCOME", "OVERRIDE"]
            .iter()
            .map(|section| text.find(section).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{text}");

        assert!(text.starts_with(
            "Decision a by coder agent at 2024-05-01T10:00:00Z (run run-1, step step-a)"
        ));
        assert!(text.contains("  [issue] Issue context: Issue #3 login fails"));
        assert!(text.contains("  Confidence: 80.0%"));
        assert!(text.contains("    - the token expired"));
        assert!(text.contains("  - Revert: loses the fix"));
        assert!(text.contains("  Status: overridden"));
        assert!(text.contains("  Artifacts: auth.rs"));
        assert!(text.contains("  By: u-1 at 2024-05-01T10:05:00Z"));
        assert!(text.contains("  Reason: manual fix"));
    }

    #[test]
    fn decision_without_outcome_skips_trailing_sections() {
        let mut t = trace("a", AgentType::Triage, 0);
        t.outcome = None;
        let text = format_decision(&explain_trace(
            &t,
            &ExplainOptions::default(),
            &HeuristicAnalyzer,
            None,
        ));
        assert!(text.contains("INPUTS"));
        assert!(text.contains("REASONING"));
        assert!(!text.contains("ALTERNATIVES"));
        assert!(!text.contains("OUTCOME"));
        assert!(!text.contains("OVERRIDE"));
    }

    #[test]
    fn run_text_has_timeline_stats_and_outcome() {
        let mut traces = vec![
            trace("b", AgentType::Reviewer, 2),
            with_override(trace("a", AgentType::Coder, 0), "u-9", 1),
        ];
        traces[0].outcome = Some(TraceOutcome {
            result: OutcomeResult::Success,
            actual_outcome: Some("updated CHANGELOG.md".to_string()),
            human_override: None,
        });
        sort_chronologically(&mut traces);
        let decisions = traces
            .iter()
            .map(|t| explain_trace(t, &ExplainOptions::default(), &HeuristicAnalyzer, None))
            .collect();
        let run = aggregate_run(RunId::new("run-1"), TenantId::new("acme"), &traces, decisions);

        let text = format_run(&run);
        let expected_timeline = [
            "  2024-05-01T10:00:00Z [ai] coder agent made decision: coder_action (a)",
            "  2024-05-01T10:01:00Z [human] Human override by u-9 (a)",
            "  2024-05-01T10:02:00Z [ai] reviewer agent made decision: reviewer_action (b)",
        ];
        for line in expected_timeline {
            assert!(text.contains(line), "missing {line:?} in\n{text}");
        }
        assert!(text.starts_with("Run run-1 (code-generation) for tenant acme"));
        assert!(text.contains("  Total decisions: 2"));
        assert!(text.contains("  Human overrides: 1"));
        assert!(text.contains("  Average confidence: 80.0%"));
        assert!(text.contains("  Duration: 120.0s"));
        assert!(text.contains("  Artifacts: CHANGELOG.md"));
        assert!(text.find("TIMELINE") < text.find("STATISTICS"));
        assert!(text.find("STATISTICS") < text.find("OUTCOME"));
    }

    fn node(data: serde_json::Value) -> ContextNode {
        ContextNode {
            id: NodeId::new("n"),
            node_type: "decision".to_string(),
            timestamp: at(0),
            data,
        }
    }

    #[rstest]
    #[case::both(serde_json::json!({"agentType": "coder", "action": "patch"}), "2024-05-01T10:00:00Z [decision] coder: patch")]
    #[case::action_only(serde_json::json!({"action": "patch"}), "2024-05-01T10:00:00Z [decision] patch")]
    #[case::agent_only(serde_json::json!({"agentType": "coder"}), "2024-05-01T10:00:00Z [decision] coder")]
    #[case::neither(serde_json::json!({"score": 3}), "2024-05-01T10:00:00Z [decision]")]
    #[case::null_payload(serde_json::Value::Null, "2024-05-01T10:00:00Z [decision]")]
    fn trajectory_lines(#[case] data: serde_json::Value, #[case] expected: &str) {
        assert_eq!(format_trajectory_node(&node(data)), expected);
    }
}
