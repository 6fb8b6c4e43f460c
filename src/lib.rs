//! # dox-agent
//!
//! A research-focused question-answering agent. Given a question, it drafts
//! a structured answer, critiques it, searches the web for the gaps, and
//! revises with citations until the configured iteration budget runs out.
//!
//! ## Overview
//!
//! The agent is a small cyclic state machine over an append-only message
//! history:
//!
//! ```text
//! DRAFT -> EXECUTE_TOOLS -> REVISE -> { EXECUTE_TOOLS | TERMINATE }
//! ```
//!
//! - **DRAFT** asks the LLM for a structured answer: text, a self-critique
//!   (`missing` / `superfluous`), and 1-3 follow-up search queries.
//! - **EXECUTE_TOOLS** fans the queries out to the search service
//!   concurrently and folds the aggregated results back into the history.
//! - **REVISE** asks the LLM for a revised answer with references, then
//!   either loops or terminates based on the tool-visit count.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use dox_agent::{
//!     Config, Orchestrator, OpenAIClient, TavilySearchClient, PromptAssembler,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> dox_agent::Result<()> {
//!     let config = Config::from_env()?;
//!
//!     let completion = Arc::new(OpenAIClient::new(
//!         config.openai_api_key.clone(),
//!         config.model.clone(),
//!         PromptAssembler::new(config.word_limit),
//!     ));
//!     let search = Arc::new(TavilySearchClient::new(
//!         config.tavily_api_key.clone(),
//!         config.max_results,
//!     ));
//!
//!     let orchestrator = Orchestrator::new(completion, search, config.max_iterations);
//!     let history = orchestrator.run("What is quantum computing?".into()).await?;
//!
//!     println!("{}", dox_agent::cli::output::final_proposal(&history)?.answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`agent`] - The draft/search/revise orchestrator
//! - [`llm`] - Completion client trait and OpenAI implementation
//! - [`tools`] - Search client trait and Tavily implementation
//! - [`prompts`] - Prompt assembly
//! - [`cli`] - Argument parsing and presentation
//! - [`types`] - Message history, proposals, and error handling
//! - [`utils`] - Configuration

/// The draft/search/revise control loop.
pub mod agent;
/// CLI argument parsing and terminal output.
pub mod cli;
/// Completion client implementations.
pub mod llm;
/// Prompt assembly for draft and revise calls.
pub mod prompts;
/// External tool clients (web search).
pub mod tools;
/// Core types (turns, proposals, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agent::{AgentInput, NextState, Orchestrator};
pub use llm::{AnswerSchema, CompletionClient, OpenAIClient};
pub use prompts::{PromptAssembler, PromptRole};
pub use tools::{SearchClient, TavilySearchClient};
pub use types::{AppError, Proposal, Reflection, Result, ToolResults, Turn};
pub use utils::config::Config;
