//! Presentation layer: renders the final history to the terminal and
//! optionally dumps the final structured answer to a file.
//!
//! Reference parsing here is opportunistic and display-only. A reference
//! that looks like a `{Author, Title, URL, Date}` record is rendered in
//! citation style; anything that fails to parse falls back to opaque text.
//! That fallback is the one deliberately swallowed error in the system.

use crate::types::{AppError, Proposal, Result, Turn};
use owo_colors::OwoColorize;
use std::path::Path;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n{}", title.bright_white().bold().underline());
        } else {
            println!("\n=== {} ===", title);
        }
    }

    fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n{}", title.cyan().bold());
        } else {
            println!("\n--- {} ---", title);
        }
    }

    fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("  {}: {}", key.dimmed(), value);
        } else {
            println!("  {}: {}", key, value);
        }
    }

    /// Print the final answer plus a numbered reference list.
    pub fn render_standard(&self, history: &[Turn]) -> Result<()> {
        let proposal = final_proposal(history)?;

        println!("{}", proposal.answer);

        let references = proposal.references.as_deref().unwrap_or_default();
        if !references.is_empty() {
            self.header("References");
            for (i, reference) in references.iter().enumerate() {
                println!("{}", format_reference(reference, i + 1));
            }
        }

        Ok(())
    }

    /// Dump every intermediate proposal's answer, reflection, and queries.
    pub fn render_verbose(&self, history: &[Turn]) {
        for turn in history {
            let Some(proposal) = turn.as_proposal() else {
                continue;
            };

            self.header("Message");
            self.kv("Answer", &proposal.answer);

            self.subheader("Reflection");
            self.kv("Missing", &proposal.reflection.missing);
            self.kv("Superfluous", &proposal.reflection.superfluous);

            self.kv("Search Queries", &format!("{:?}", proposal.search_queries));

            if let Some(references) = &proposal.references {
                self.subheader("References");
                for (i, reference) in references.iter().enumerate() {
                    println!("  {}", format_reference(reference, i + 1));
                }
            }
        }
    }
}

/// The final proposal in the history, i.e. the current best answer.
pub fn final_proposal(history: &[Turn]) -> Result<&Proposal> {
    history
        .iter()
        .rev()
        .find_map(Turn::as_proposal)
        .ok_or_else(|| AppError::InvalidState("History contains no proposal".to_string()))
}

/// Write the final proposal to `path` as pretty-printed JSON.
pub fn save_output(history: &[Turn], path: &Path) -> Result<()> {
    let proposal = final_proposal(history)?;
    let json = serde_json::to_string_pretty(proposal)
        .map_err(|e| AppError::Internal(format!("Failed to serialize output: {}", e)))?;

    std::fs::write(path, json)
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))
}

/// Format one reference in citation style.
///
/// Structured `{Author, Title, URL, Date}` records render as
/// `[n] Author - Title - URL (Date)`; everything else renders as
/// `[n] <text>`.
pub fn format_reference(reference: &str, index: usize) -> String {
    match parse_reference(reference) {
        Some(record) => format!(
            "[{}] {} - {} - {} ({})",
            index, record.author, record.title, record.url, record.date
        ),
        None => format!("[{}] {}", index, reference),
    }
}

struct ReferenceRecord {
    author: String,
    title: String,
    url: String,
    date: String,
}

/// Try to parse a reference as a structured record.
///
/// Accepts both JSON and single-quoted dict-like strings, since the model
/// emits either. Returns `None` when the string does not parse or carries
/// no `Author` key.
fn parse_reference(reference: &str) -> Option<ReferenceRecord> {
    let trimmed = reference.trim();
    if !trimmed.starts_with('{') {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .or_else(|_| serde_json::from_str(&trimmed.replace('\'', "\"")))
        .ok()?;
    let object = value.as_object()?;

    // Only records keyed by Author get citation formatting.
    object.get("Author")?;

    let field = |key: &str, missing: &str| {
        object
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(missing)
            .to_string()
    };

    Some(ReferenceRecord {
        author: field("Author", "No Author"),
        title: field("Title", "No Title"),
        url: field("URL", "No URL"),
        date: field("Date", "N/A"),
    })
}
