//! Completion client abstractions.
//!
//! The orchestrator talks to the LLM through the [`CompletionClient`] trait,
//! which constrains every call to return exactly one structured answer shape.
//! [`openai::OpenAIClient`] is the production implementation; tests supply
//! their own trait impls.

/// Core completion trait and structured output schemas.
pub mod client;
/// OpenAI-backed completion client.
pub mod openai;

pub use client::{AnswerSchema, CompletionClient};
pub use openai::OpenAIClient;
