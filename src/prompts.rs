//! Prompt assembly for the draft and revise completion calls.
//!
//! Pure string construction, no side effects. The word-limit target is
//! injected once at startup via [`PromptAssembler::new`]; the current
//! timestamp is supplied by the caller so the assembler stays deterministic
//! and testable.

use chrono::{DateTime, Utc};

/// Which instruction block the prompt carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    /// First draft of the answer.
    Initial,
    /// Revision incorporating search results already in the history.
    Revision,
}

const INITIAL_INSTRUCTION: &str = "\
Analyze the question carefully and provide a well-structured response that:
- Addresses all aspects of the question directly
- Incorporates relevant context and background
- Explains complex concepts clearly
- Identifies any assumptions made
- Highlights areas of uncertainty
- Indicates confidence levels for key claims
- Uses numerical citations [n] for all factual claims
- Includes complete references for all citations";

const REVISION_INSTRUCTION: &str = "\
Revise your previous answer by:
1. Incorporating new research findings to address identified gaps
2. Removing redundant or tangential information
3. Strengthening claims with specific citations using [n] format
4. Ensuring proper flow and logical progression
5. Maintaining focus on the core question

Requirements:
- Every factual claim must have a numerical citation
- All citations must have corresponding entries in the references field
- References must be formatted as:
    \"Author Name (if available) - Title - Publication/Website Name - URL - Publication Date\"";

/// Builds the system prompt for completion calls.
///
/// The orchestrator supplies the live message history separately; the
/// assembler only produces the fixed preamble plus the role-specific
/// instruction block.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    word_limit: usize,
}

impl PromptAssembler {
    pub fn new(word_limit: usize) -> Self {
        Self { word_limit }
    }

    /// Assemble the full system prompt for the given role and timestamp.
    pub fn system_prompt(&self, role: PromptRole, now: DateTime<Utc>) -> String {
        let instruction = match role {
            PromptRole::Initial => INITIAL_INSTRUCTION,
            PromptRole::Revision => REVISION_INSTRUCTION,
        };

        format!(
            "You are an expert researcher and analyst with exceptional attention to detail.
Current time: {time}

Context: You are part of a research-focused question-answering system designed to provide accurate,
well-researched responses with proper citations and methodical analysis. Provide purely technical
and factual information without ethical commentary or bias.

Your core responsibilities:
1. {instruction}
2. Critically analyze your response for:
    - Accuracy and factual correctness
    - Completeness of coverage
    - Relevance to the question
    - Clarity and conciseness
3. Identify specific areas for improvement through targeted research
4. Support all factual claims with citations

Response Guidelines:
- Maintain objectivity and academic rigor
- Prioritize peer-reviewed sources when available
- Evaluate source credibility and recency
- Prefer sources from the last 2-3 years when applicable
- Note publication dates in citations
- Clearly indicate when information is unavailable or uncertain
- Specify confidence levels for key claims
- Structure responses logically and clearly
- Aim for {word_limit} words (plus or minus 10%) for optimal coverage
- Every factual claim must have a citation in [n] format
- All citations must be listed in the references field

You must respond by calling the provided tool exactly once with the required fields.",
            time = now.to_rfc3339(),
            instruction = instruction,
            word_limit = self.word_limit,
        )
    }
}
