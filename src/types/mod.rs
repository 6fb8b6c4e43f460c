use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============= Message History Types =============

/// One entry in the message history.
///
/// The history is an append-only sequence owned by a single orchestrator
/// invocation. It always starts with exactly one [`Turn::Question`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Turn {
    /// The user's research question.
    Question { content: String },
    /// A structured answer produced by the completion client.
    Proposal(Proposal),
    /// Aggregated search results for all queries issued by one proposal.
    ToolResults(ToolResults),
}

impl Turn {
    pub fn question(content: impl Into<String>) -> Self {
        Turn::Question {
            content: content.into(),
        }
    }

    /// The proposal carried by this turn, if any.
    pub fn as_proposal(&self) -> Option<&Proposal> {
        match self {
            Turn::Proposal(proposal) => Some(proposal),
            _ => None,
        }
    }

    pub fn is_tool_results(&self) -> bool {
        matches!(self, Turn::ToolResults(_))
    }
}

/// Structured answer returned by the completion client.
///
/// A draft carries `references: None`; a revised answer always carries the
/// citations motivating the update. The `id` groups the tool results issued
/// for this proposal's queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Identifier tying follow-up tool results back to this proposal.
    pub id: String,
    /// The answer text (~word-limit words).
    pub answer: String,
    /// Self-critique of the answer.
    pub reflection: Reflection,
    /// 1-3 follow-up queries addressing the critique.
    pub search_queries: Vec<String>,
    /// Citations, present on revised answers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
}

impl Proposal {
    pub fn is_revised(&self) -> bool {
        self.references.is_some()
    }
}

/// Self-critique attached to every proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reflection {
    /// Crucial information or perspectives the answer is missing.
    pub missing: String,
    /// Content that could be removed or condensed.
    pub superfluous: String,
}

/// Raw search hits, opaque to the control loop.
pub type SearchHits = Vec<serde_json::Value>;

/// Aggregated search outputs for all queries issued by one proposal.
///
/// `BTreeMap` keeps the serialized form deterministic regardless of the
/// order the fanned-out searches complete in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResults {
    /// Id of the proposal whose queries produced these results.
    pub proposal_id: String,
    /// Query string to its raw result payload.
    pub outputs: BTreeMap<String, SearchHits>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
