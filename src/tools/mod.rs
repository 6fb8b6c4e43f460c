//! External tool clients used during the EXECUTE_TOOLS stage.
//!
//! Currently a single tool: web search via the Tavily API. The orchestrator
//! depends only on the [`SearchClient`] trait so tests can substitute their
//! own implementations.

/// Web search client (Tavily).
pub mod search;

pub use search::{SearchClient, TavilySearchClient};
