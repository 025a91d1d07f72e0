//! Run aggregator: chains per-trace explanations into a `RunExplanation`.
//!
//! Everything here runs after the single bulk fetch and after every
//! per-trace explanation exists. All passes are sequential over the
//! timestamp-sorted list.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    AgentDecisionTrace, AgentType, DecisionExplanation, ExplanationLinks, OutcomeResult,
    RunExplanation, RunId, RunOutcome, RunStats, RunStatus, RunType, StepId, TenantId,
    TimelineActor, TimelineEntry,
};

/// Stable sort by timestamp; ties keep the store's return order.
pub fn sort_chronologically(traces: &mut [AgentDecisionTrace]) {
    traces.sort_by_key(|t| t.timestamp);
}

/// Chain links for each trace, in the order given.
///
/// `related` lists other traces recorded for the same step. Works on the
/// traces alone, so a single step can be linked without explaining the rest.
pub fn chain_links(traces: &[AgentDecisionTrace]) -> Vec<ExplanationLinks> {
    let mut by_step: HashMap<&StepId, Vec<usize>> = HashMap::new();
    for (i, trace) in traces.iter().enumerate() {
        if let Some(step) = trace.step_id.as_ref().filter(|s| !s.is_empty()) {
            by_step.entry(step).or_default().push(i);
        }
    }

    traces
        .iter()
        .enumerate()
        .map(|(i, trace)| ExplanationLinks {
            previous_step: i.checked_sub(1).map(|prev| traces[prev].id.clone()),
            next_step: traces.get(i + 1).map(|next| next.id.clone()),
            related: trace
                .step_id
                .as_ref()
                .and_then(|step| by_step.get(step))
                .map(|indices| {
                    indices
                        .iter()
                        .filter(|&&j| j != i)
                        .map(|&j| traces[j].id.clone())
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

/// One AI event per trace plus one human event per override, by timestamp.
pub fn build_timeline(traces: &[AgentDecisionTrace]) -> Vec<TimelineEntry> {
    let mut timeline = Vec::with_capacity(traces.len());
    for trace in traces {
        timeline.push(TimelineEntry {
            timestamp: trace.timestamp,
            event: format!(
                "{} agent made decision: {}",
                trace.agent_type, trace.decision.action
            ),
            actor: TimelineActor::Ai,
            trace_id: trace.id.clone(),
        });
        if let Some(o) = trace.human_override() {
            timeline.push(TimelineEntry {
                timestamp: o.timestamp,
                event: format!("Human override by {}", o.user_id),
                actor: TimelineActor::Human,
                trace_id: trace.id.clone(),
            });
        }
    }
    timeline.sort_by_key(|entry| entry.timestamp);
    timeline
}

/// `traces` must already be sorted chronologically.
pub fn compute_stats(traces: &[AgentDecisionTrace]) -> RunStats {
    let total = traces.len();
    let average_confidence = if total == 0 {
        0.0
    } else {
        traces.iter().map(|t| t.decision.confidence).sum::<f64>() / total as f64
    };
    let duration_ms = match (traces.first(), traces.last()) {
        (Some(first), Some(last)) => (last.timestamp - first.timestamp).num_milliseconds(),
        _ => 0,
    };

    RunStats {
        total_decisions: total,
        human_overrides: traces.iter().filter(|t| t.human_override().is_some()).count(),
        average_confidence,
        duration_ms,
    }
}

/// Union of per-decision artifacts, first-seen order.
pub fn collect_artifacts(decisions: &[DecisionExplanation]) -> Vec<String> {
    let mut seen = HashSet::new();
    decisions
        .iter()
        .flat_map(|d| d.artifacts())
        .filter(|artifact| seen.insert(artifact.as_str()))
        .cloned()
        .collect()
}

/// Distinct agent types in order of first appearance.
pub fn distinct_agents(traces: &[AgentDecisionTrace]) -> Vec<AgentType> {
    let mut agents = Vec::new();
    for trace in traces {
        if !agents.contains(&trace.agent_type) {
            agents.push(trace.agent_type);
        }
    }
    agents
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// "a", "a and b", "a, b and c"
fn natural_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

pub fn summarize(
    run_type: RunType,
    agents: &[AgentType],
    stats: &RunStats,
    status: RunStatus,
) -> String {
    let names: Vec<&str> = agents.iter().map(AgentType::as_str).collect();
    let agent_noun = if agents.len() == 1 { "agent" } else { "agents" };
    let overrides = if stats.human_overrides > 0 {
        format!(", with {}", plural(stats.human_overrides, "human override"))
    } else {
        String::new()
    };

    format!(
        "{} run with {} by the {} {}{}. Final status: {}.",
        run_type.label(),
        plural(stats.total_decisions, "decision"),
        natural_list(&names),
        agent_noun,
        overrides,
        status
    )
}

fn describe_outcome(status: RunStatus, traces: &[AgentDecisionTrace]) -> String {
    let total = traces.len();
    match status {
        RunStatus::Success => format!("{} completed successfully", plural(total, "decision")),
        RunStatus::Failure => {
            let failed = traces
                .iter()
                .filter(|t| t.result() == Some(OutcomeResult::Failure))
                .count();
            format!("{failed} of {} failed", plural(total, "decision"))
        }
        RunStatus::Pending => {
            let waiting = traces.iter().filter(|t| t.outcome.is_none()).count();
            format!("{waiting} of {} awaiting an outcome", plural(total, "decision"))
        }
    }
}

/// Assemble the run explanation.
///
/// `traces` must be sorted chronologically and `decisions` must be the
/// per-trace explanations in the same order.
pub fn aggregate_run(
    run_id: RunId,
    tenant_id: TenantId,
    traces: &[AgentDecisionTrace],
    mut decisions: Vec<DecisionExplanation>,
) -> RunExplanation {
    debug_assert_eq!(traces.len(), decisions.len());

    for (decision, links) in decisions.iter_mut().zip(chain_links(traces)) {
        decision.links = links;
    }
    let timeline = build_timeline(traces);
    let stats = compute_stats(traces);
    let status = RunStatus::from_results(traces.iter().map(AgentDecisionTrace::result));
    let agents = distinct_agents(traces);
    let run_type = RunType::infer(&agents);
    let summary = summarize(run_type, &agents, &stats, status);

    let outcome = RunOutcome {
        status,
        description: describe_outcome(status, traces),
        artifacts: collect_artifacts(&decisions),
    };

    RunExplanation {
        run_id,
        run_type,
        tenant_id,
        summary,
        decisions,
        outcome,
        timeline,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::decision::explain_trace;
    use crate::app::decision::fixtures::{at, trace, with_override, with_result};
    use crate::app::options::ExplainOptions;
    use crate::domain::{TraceId, TraceOutcome};
    use crate::impls::HeuristicAnalyzer;

    fn aggregate(mut traces: Vec<AgentDecisionTrace>) -> RunExplanation {
        sort_chronologically(&mut traces);
        let decisions = traces
            .iter()
            .map(|t| explain_trace(t, &ExplainOptions::default(), &HeuristicAnalyzer, None))
            .collect();
        aggregate_run(RunId::new("run-1"), TenantId::new("acme"), &traces, decisions)
    }

    #[test]
    fn decisions_are_sorted_and_chained() {
        let run = aggregate(vec![
            trace("c", AgentType::Reviewer, 20),
            trace("a", AgentType::Triage, 0),
            trace("b", AgentType::Coder, 10),
        ]);

        let ids: Vec<&str> = run.decisions.iter().map(|d| d.trace_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        for pair in run.decisions.windows(2) {
            assert_eq!(pair[0].links.next_step.as_ref(), Some(&pair[1].trace_id));
            assert_eq!(pair[1].links.previous_step.as_ref(), Some(&pair[0].trace_id));
        }
        assert!(run.decisions[0].links.previous_step.is_none());
        assert!(run.decisions[2].links.next_step.is_none());
    }

    #[test]
    fn equal_timestamps_keep_store_order() {
        let mut traces = vec![
            trace("second", AgentType::Coder, 5),
            trace("first", AgentType::Coder, 5),
        ];
        sort_chronologically(&mut traces);
        assert_eq!(traces[0].id.as_str(), "second");
    }

    #[test]
    fn single_trace_has_no_links_and_zero_duration() {
        let run = aggregate(vec![trace("a", AgentType::Triage, 0)]);
        assert!(run.decisions[0].links.previous_step.is_none());
        assert!(run.decisions[0].links.next_step.is_none());
        assert_eq!(run.stats.duration_ms, 0);
        assert_eq!(run.stats.total_decisions, 1);
    }

    #[test]
    fn related_links_group_decisions_of_one_step() {
        let mut retry = trace("a2", AgentType::Coder, 5);
        retry.step_id = Some(StepId::new("step-a"));
        let run = aggregate(vec![
            trace("a", AgentType::Coder, 0),
            retry,
            trace("b", AgentType::Reviewer, 9),
        ]);

        assert_eq!(run.decisions[0].links.related, vec![TraceId::new("a2")]);
        assert_eq!(run.decisions[1].links.related, vec![TraceId::new("a")]);
        assert!(run.decisions[2].links.related.is_empty());
    }

    #[test]
    fn timeline_interleaves_overrides_by_timestamp() {
        let run = aggregate(vec![
            with_override(trace("a", AgentType::Triage, 0), "u-1", 15),
            trace("b", AgentType::Coder, 10),
            trace("c", AgentType::Reviewer, 20),
        ]);

        let events: Vec<(&str, TimelineActor)> = run
            .timeline
            .iter()
            .map(|e| (e.event.as_str(), e.actor))
            .collect();
        assert_eq!(
            events,
            vec![
                ("triage agent made decision: triage_action", TimelineActor::Ai),
                ("coder agent made decision: coder_action", TimelineActor::Ai),
                ("Human override by u-1", TimelineActor::Human),
                ("reviewer agent made decision: reviewer_action", TimelineActor::Ai),
            ]
        );
        assert!(run.timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(run.timeline[2].trace_id, TraceId::new("a"));
    }

    #[test]
    fn stats_count_overrides_and_average_confidence() {
        let mut a = trace("a", AgentType::Triage, 0);
        a.decision.confidence = 0.5;
        let mut b = with_override(trace("b", AgentType::Coder, 3), "u-2", 4);
        b.decision.confidence = 1.0;

        let run = aggregate(vec![a, b]);
        assert_eq!(run.stats.total_decisions, 2);
        assert_eq!(run.stats.human_overrides, 1);
        assert!((run.stats.average_confidence - 0.75).abs() < f64::EPSILON);
        assert_eq!(run.stats.duration_ms, 3 * 60 * 1000);
    }

    #[test]
    fn failure_anywhere_fails_the_run() {
        let run = aggregate(vec![
            trace("a", AgentType::Triage, 0),
            with_result(trace("b", AgentType::Coder, 1), OutcomeResult::Failure),
            trace("c", AgentType::Reviewer, 2),
        ]);
        assert_eq!(run.outcome.status, RunStatus::Failure);
        assert_eq!(run.outcome.description, "1 of 3 decisions failed");
    }

    #[test]
    fn overridden_failure_still_fails_the_run() {
        let failed = with_result(trace("a", AgentType::Coder, 0), OutcomeResult::Failure);
        let run = aggregate(vec![with_override(failed, "u-1", 1)]);
        assert_eq!(run.outcome.status, RunStatus::Failure);
    }

    #[test]
    fn missing_outcome_leaves_the_run_pending() {
        let mut open = trace("b", AgentType::Coder, 1);
        open.outcome = None;
        let run = aggregate(vec![trace("a", AgentType::Triage, 0), open]);
        assert_eq!(run.outcome.status, RunStatus::Pending);
        assert_eq!(run.outcome.description, "1 of 2 decisions awaiting an outcome");
    }

    #[test]
    fn run_artifacts_are_deduplicated_across_decisions() {
        let mut a = trace("a", AgentType::Coder, 0);
        a.outcome = Some(TraceOutcome {
            result: OutcomeResult::Success,
            actual_outcome: Some("created a.rs and updated a.rs".to_string()),
            human_override: None,
        });
        let mut b = trace("b", AgentType::Coder, 1);
        b.outcome = Some(TraceOutcome {
            result: OutcomeResult::Success,
            actual_outcome: Some("modified b.rs, updated a.rs".to_string()),
            human_override: None,
        });

        let run = aggregate(vec![a, b]);
        assert_eq!(run.decisions[0].artifacts(), ["a.rs".to_string(), "a.rs".to_string()]);
        assert_eq!(run.outcome.artifacts, vec!["a.rs", "b.rs"]);
    }

    #[test]
    fn summary_names_agents_overrides_and_status() {
        let run = aggregate(vec![
            trace("a", AgentType::Triage, 0),
            with_override(trace("b", AgentType::Coder, 1), "u-1", 2),
            trace("c", AgentType::Coder, 3),
        ]);
        assert_eq!(run.run_type, RunType::CodeGeneration);
        assert_eq!(
            run.summary,
            "Code-generation run with 3 decisions by the triage and coder agents, with 1 human override. Final status: success."
        );
    }

    #[test]
    fn summary_omits_override_clause_when_none() {
        let run = aggregate(vec![trace("a", AgentType::Orchestrator, 0)]);
        assert_eq!(
            run.summary,
            "Unclassified run with 1 decision by the orchestrator agent. Final status: success."
        );
        assert_eq!(run.outcome.description, "1 decision completed successfully");
    }

    #[test]
    fn natural_list_joins_like_prose() {
        assert_eq!(natural_list(&[]), "");
        assert_eq!(natural_list(&["a"]), "a");
        assert_eq!(natural_list(&["a", "b"]), "a and b");
        assert_eq!(natural_list(&["a", "b", "c"]), "a, b and c");
    }

    #[test]
    fn override_timestamp_can_precede_the_decision() {
        // clock skew between systems is tolerated: ordering is by timestamp only
        let run = aggregate(vec![with_override(trace("a", AgentType::Coder, 10), "u-1", 0)]);
        assert_eq!(run.timeline[0].actor, TimelineActor::Human);
        assert_eq!(run.timeline[0].timestamp, at(0));
    }
}
