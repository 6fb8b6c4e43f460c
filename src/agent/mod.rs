//! Draft / search / revise control loop.
//!
//! # Control flow
//!
//! ```text
//! DRAFT -> EXECUTE_TOOLS -> REVISE -> { EXECUTE_TOOLS | TERMINATE }
//! ```
//!
//! The loop terminates once the number of tool-result turns in the history
//! exceeds `max_iterations`. The transition rule lives in
//! [`orchestrator::next_state`] so it can be tested in isolation.

/// The orchestrator and its transition function.
pub mod orchestrator;

pub use orchestrator::{next_state, AgentInput, NextState, Orchestrator};
