//! Integration tests for the draft/search/revise loop.
//!
//! The completion and search services are replaced with in-process mocks so
//! the loop's observable behavior (turn sequence, call counts, termination
//! boundary) can be checked exactly.

use async_trait::async_trait;
use dox_agent::{
    AgentInput, AnswerSchema, AppError, CompletionClient, Orchestrator, Proposal, Reflection,
    SearchClient, Turn,
};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Completion mock that emits a fresh proposal per call with a fixed set of
/// follow-up queries.
struct ScriptedCompletion {
    queries: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    fn new(queries: &[&str]) -> Self {
        Self {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn propose(&self, schema: AnswerSchema, _history: &[Turn]) -> dox_agent::Result<Proposal> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Proposal {
            id: format!("call_{}", n),
            answer: format!("answer {}", n),
            reflection: Reflection::default(),
            search_queries: self.queries.clone(),
            references: match schema {
                AnswerSchema::Draft => None,
                AnswerSchema::Revised => Some(vec!["[1] source".to_string()]),
            },
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Search mock that records every query it receives.
struct RecordingSearch {
    received: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingSearch {
    fn new() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    fn failing_on(query: &str) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_on: Some(query.to_string()),
        }
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for RecordingSearch {
    async fn search(&self, query: &str) -> dox_agent::Result<Vec<serde_json::Value>> {
        self.received.lock().unwrap().push(query.to_string());

        if self.fail_on.as_deref() == Some(query) {
            return Err(AppError::Search("simulated transport failure".to_string()));
        }

        Ok(vec![serde_json::json!({
            "title": format!("result for {}", query),
            "url": "https://example.com",
        })])
    }
}

fn tool_turns(history: &[Turn]) -> Vec<&dox_agent::ToolResults> {
    history
        .iter()
        .filter_map(|turn| match turn {
            Turn::ToolResults(results) => Some(results),
            _ => None,
        })
        .collect()
}

fn proposals(history: &[Turn]) -> Vec<&Proposal> {
    history.iter().filter_map(Turn::as_proposal).collect()
}

#[tokio::test]
async fn test_draft_appends_exactly_one_proposal() {
    let completion = Arc::new(ScriptedCompletion::new(&["q1"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion, search, 0);

    let history = orchestrator
        .run(AgentInput::Question("What is Rust?".to_string()))
        .await
        .unwrap();

    assert!(matches!(history[0], Turn::Question { .. }));
    let first_proposal = history[1].as_proposal().unwrap();
    assert!(!first_proposal.is_revised());
}

#[tokio::test]
async fn test_zero_iterations_runs_one_revise_cycle() {
    let completion = Arc::new(ScriptedCompletion::new(&["q1", "q2"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion.clone(), search.clone(), 0);

    let history = orchestrator.run("question".into()).await.unwrap();

    // Question, draft, one tool-result turn, one revised answer.
    assert_eq!(history.len(), 4);
    assert_eq!(tool_turns(&history).len(), 1);
    // One draft call plus one revise call.
    assert_eq!(completion.call_count(), 2);
    // Two queries fanned out exactly once.
    assert_eq!(search.received().len(), 2);

    let last = history.last().unwrap().as_proposal().unwrap();
    assert!(last.is_revised());
}

#[rstest]
#[case::zero(0, 1)]
#[case::one(1, 2)]
#[case::two(2, 3)]
#[tokio::test]
async fn test_termination_after_count_exceeds_threshold(
    #[case] max_iterations: usize,
    #[case] expected_cycles: usize,
) {
    let completion = Arc::new(ScriptedCompletion::new(&["follow-up"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion.clone(), search, max_iterations);

    let history = orchestrator.run("question".into()).await.unwrap();

    // The loop terminates exactly when tool visits first exceed the
    // threshold, giving max_iterations + 1 revise cycles.
    assert_eq!(tool_turns(&history).len(), expected_cycles);
    assert_eq!(proposals(&history).len(), expected_cycles + 1);
    assert_eq!(completion.call_count(), expected_cycles + 1);
}

#[tokio::test]
async fn test_empty_query_list_still_advances() {
    let completion = Arc::new(ScriptedCompletion::new(&[]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion, search.clone(), 0);

    let history = orchestrator.run("question".into()).await.unwrap();

    // No search calls, but exactly one aggregated (empty) tool-result turn.
    assert!(search.received().is_empty());
    let tools = tool_turns(&history);
    assert_eq!(tools.len(), 1);
    assert!(tools[0].outputs.is_empty());
}

#[tokio::test]
async fn test_tool_results_grouped_under_proposal_id() {
    let completion = Arc::new(ScriptedCompletion::new(&["a", "b"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion, search, 0);

    let history = orchestrator.run("question".into()).await.unwrap();

    let draft_id = history[1].as_proposal().unwrap().id.clone();
    let tools = tool_turns(&history);
    assert_eq!(tools[0].proposal_id, draft_id);
    assert_eq!(
        tools[0].outputs.keys().cloned().collect::<Vec<_>>(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[tokio::test]
async fn test_failed_query_degrades_to_empty_results() {
    let completion = Arc::new(ScriptedCompletion::new(&["good", "bad"]));
    let search = Arc::new(RecordingSearch::failing_on("bad"));
    let orchestrator = Orchestrator::new(completion, search, 0);

    let history = orchestrator.run("question".into()).await.unwrap();

    let tools = tool_turns(&history);
    assert_eq!(tools.len(), 1);
    assert!(tools[0].outputs["bad"].is_empty());
    assert_eq!(tools[0].outputs["good"].len(), 1);
}

#[tokio::test]
async fn test_identical_queries_reissued_across_iterations() {
    // The same query every cycle must be re-issued, never memoized.
    let completion = Arc::new(ScriptedCompletion::new(&["same query"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion, search.clone(), 1);

    orchestrator.run("question".into()).await.unwrap();

    assert_eq!(
        search.received(),
        vec!["same query".to_string(), "same query".to_string()]
    );
}

#[tokio::test]
async fn test_preseeded_history_is_accepted() {
    let completion = Arc::new(ScriptedCompletion::new(&["q"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion, search, 0);

    let seeded = vec![Turn::question("pre-seeded question")];
    let history = orchestrator
        .run(AgentInput::History(seeded))
        .await
        .unwrap();

    assert!(matches!(&history[0], Turn::Question { content } if content == "pre-seeded question"));
}

#[tokio::test]
async fn test_empty_history_fails_before_any_call() {
    let completion = Arc::new(ScriptedCompletion::new(&["q"]));
    let search = Arc::new(RecordingSearch::new());
    let orchestrator = Orchestrator::new(completion.clone(), search.clone(), 0);

    let result = orchestrator.run(AgentInput::History(vec![])).await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(completion.call_count(), 0);
    assert!(search.received().is_empty());
}
