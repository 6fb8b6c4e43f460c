//! The orchestrator drives the draft, search, and revise stages over one
//! message history per invocation.

use crate::llm::{AnswerSchema, CompletionClient};
use crate::tools::SearchClient;
use crate::types::{AppError, Result, ToolResults, Turn};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Input accepted at the invocation boundary: a raw question or a
/// pre-seeded history.
#[derive(Debug, Clone)]
pub enum AgentInput {
    Question(String),
    History(Vec<Turn>),
}

impl From<&str> for AgentInput {
    fn from(question: &str) -> Self {
        AgentInput::Question(question.to_string())
    }
}

/// Where the loop goes after a REVISE step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    ExecuteTools,
    Terminate,
}

/// Number of tool-result turns accumulated so far.
pub fn tool_visits(history: &[Turn]) -> usize {
    history.iter().filter(|turn| turn.is_tool_results()).count()
}

/// Transition rule applied after each REVISE step.
///
/// Terminates when the tool-visit count exceeds `max_iterations`; a count
/// equal to `max_iterations` continues. The effective number of revise
/// cycles is therefore `max_iterations + 1`, matching the behavior this
/// system was built against.
pub fn next_state(history: &[Turn], max_iterations: usize) -> NextState {
    if tool_visits(history) > max_iterations {
        NextState::Terminate
    } else {
        NextState::ExecuteTools
    }
}

/// Drives the draft -> execute_tools -> revise loop to completion.
///
/// Owns its history exclusively for the duration of one [`run`] call;
/// independent instances may process different questions in parallel with
/// no coordination.
///
/// [`run`]: Orchestrator::run
pub struct Orchestrator {
    completion: Arc<dyn CompletionClient>,
    search: Arc<dyn SearchClient>,
    max_iterations: usize,
}

impl Orchestrator {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        search: Arc<dyn SearchClient>,
        max_iterations: usize,
    ) -> Self {
        Self {
            completion,
            search,
            max_iterations,
        }
    }

    /// Run the full loop and return the complete turn history.
    ///
    /// The caller extracts the final turn as the answer to present.
    pub async fn run(&self, input: AgentInput) -> Result<Vec<Turn>> {
        let mut history = seed_history(input)?;

        tracing::info!(model = self.completion.model_name(), "Drafting initial answer");
        let draft = self
            .completion
            .propose(AnswerSchema::Draft, &history)
            .await?;
        history.push(Turn::Proposal(draft));

        loop {
            self.execute_tools(&mut history).await?;

            tracing::info!(
                iteration = tool_visits(&history),
                "Revising answer with search results"
            );
            let revised = self
                .completion
                .propose(AnswerSchema::Revised, &history)
                .await?;
            history.push(Turn::Proposal(revised));

            if next_state(&history, self.max_iterations) == NextState::Terminate {
                break;
            }
        }

        Ok(history)
    }

    /// EXECUTE_TOOLS: fan out one search per query of the latest proposal
    /// and append exactly one aggregated tool-result turn.
    ///
    /// The searches for one proposal are independent, so they run
    /// concurrently; aggregation waits for every outstanding call. A failed
    /// query degrades to an empty result set rather than aborting the
    /// invocation.
    async fn execute_tools(&self, history: &mut Vec<Turn>) -> Result<()> {
        let proposal = history
            .iter()
            .rev()
            .find_map(Turn::as_proposal)
            .ok_or_else(|| {
                AppError::InvalidState("No proposal to extract search queries from".to_string())
            })?;

        let proposal_id = proposal.id.clone();
        let queries = proposal.search_queries.clone();

        tracing::info!(
            proposal = %proposal_id,
            count = queries.len(),
            "Executing search queries"
        );

        let mut set = JoinSet::new();
        for query in queries {
            let search = Arc::clone(&self.search);
            set.spawn(async move {
                let result = search.search(&query).await;
                (query, result)
            });
        }

        let mut outputs = BTreeMap::new();
        while let Some(joined) = set.join_next().await {
            let (query, result) = joined
                .map_err(|e| AppError::Internal(format!("Search task panicked: {}", e)))?;

            let hits = match result {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Search failed, continuing with empty results");
                    Vec::new()
                }
            };
            outputs.insert(query, hits);
        }

        // One aggregated turn per proposal, even when the query list is empty.
        history.push(Turn::ToolResults(ToolResults {
            proposal_id,
            outputs,
        }));

        Ok(())
    }
}

/// Normalize the invocation input into a valid starting history.
fn seed_history(input: AgentInput) -> Result<Vec<Turn>> {
    match input {
        AgentInput::Question(question) => {
            if question.trim().is_empty() {
                return Err(AppError::InvalidState("Empty question received".to_string()));
            }
            Ok(vec![Turn::question(question)])
        }
        AgentInput::History(history) => {
            if history.is_empty() {
                return Err(AppError::InvalidState("Empty history received".to_string()));
            }
            if !matches!(history[0], Turn::Question { .. }) {
                return Err(AppError::InvalidState(
                    "History must start with a question turn".to_string(),
                ));
            }
            Ok(history)
        }
    }
}
