//! Completion client trait and structured answer schemas.

use crate::prompts::PromptRole;
use crate::types::{AppError, Proposal, Reflection, Result, Turn};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// The structured output shape a completion call is constrained to.
///
/// Mirrors the two tool definitions exposed to the model: the draft shape
/// and the revised shape that additionally requires citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSchema {
    /// Initial answer: text, reflection, follow-up queries.
    Draft,
    /// Revised answer: the draft fields plus references.
    Revised,
}

impl AnswerSchema {
    /// Tool name the model is forced to call.
    pub fn tool_name(&self) -> &'static str {
        match self {
            AnswerSchema::Draft => "AnswerQuestion",
            AnswerSchema::Revised => "ReviseAnswer",
        }
    }

    /// The instruction block that accompanies this shape.
    pub fn prompt_role(&self) -> PromptRole {
        match self {
            AnswerSchema::Draft => PromptRole::Initial,
            AnswerSchema::Revised => PromptRole::Revision,
        }
    }

    pub fn requires_references(&self) -> bool {
        matches!(self, AnswerSchema::Revised)
    }

    /// JSON schema for the tool parameters.
    pub fn parameters(&self) -> Value {
        let mut properties = json!({
            "answer": {
                "type": "string",
                "description": "Detailed answer to the question, around the configured word limit."
            },
            "reflection": {
                "type": "object",
                "properties": {
                    "missing": {
                        "type": "string",
                        "description": "Key information, perspectives, or evidence that would strengthen the answer."
                    },
                    "superfluous": {
                        "type": "string",
                        "description": "Content that could be removed or condensed for clarity and focus."
                    }
                },
                "required": ["missing", "superfluous"]
            },
            "search_queries": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 3,
                "description": "1-3 search queries for researching improvements to address the critique."
            }
        });
        let mut required = vec!["answer", "reflection", "search_queries"];

        if self.requires_references() {
            properties["references"] = json!({
                "type": "array",
                "items": { "type": "string" },
                "description": "Citations motivating your updated answer."
            });
            required.push("references");
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

/// Generates structured answers over the running message history.
///
/// Implementations must force the backend to emit exactly one instance of
/// the requested [`AnswerSchema`]; open-ended free text is a
/// [`AppError::Completion`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Produce one proposal of the given shape from the full history.
    async fn propose(&self, schema: AnswerSchema, history: &[Turn]) -> Result<Proposal>;

    /// The model identifier behind this client.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ProposalPayload {
    answer: String,
    #[serde(default)]
    reflection: Reflection,
    #[serde(default)]
    search_queries: Vec<String>,
    references: Option<Vec<String>>,
}

/// Parse and validate raw tool-call arguments into a [`Proposal`].
///
/// Malformed JSON and shape violations both surface as
/// [`AppError::Completion`], per the completion contract.
pub(crate) fn parse_tool_arguments(
    schema: AnswerSchema,
    id: String,
    arguments: &str,
) -> Result<Proposal> {
    let payload: ProposalPayload = serde_json::from_str(arguments).map_err(|e| {
        AppError::Completion(format!(
            "Malformed {} arguments: {}",
            schema.tool_name(),
            e
        ))
    })?;

    if payload.search_queries.len() > 3 {
        return Err(AppError::Completion(format!(
            "{} returned {} search queries, expected at most 3",
            schema.tool_name(),
            payload.search_queries.len()
        )));
    }

    if schema.requires_references() && payload.references.is_none() {
        return Err(AppError::Completion(format!(
            "{} output is missing the references field",
            schema.tool_name()
        )));
    }

    Ok(Proposal {
        id,
        answer: payload.answer,
        reflection: payload.reflection,
        search_queries: payload.search_queries,
        references: payload.references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_tool_names() {
        assert_eq!(AnswerSchema::Draft.tool_name(), "AnswerQuestion");
        assert_eq!(AnswerSchema::Revised.tool_name(), "ReviseAnswer");
    }

    #[test]
    fn test_draft_parameters_omit_references() {
        let params = AnswerSchema::Draft.parameters();
        assert!(params["properties"].get("references").is_none());

        let params = AnswerSchema::Revised.parameters();
        assert!(params["properties"].get("references").is_some());
        assert!(params["required"]
            .as_array()
            .unwrap()
            .contains(&json!("references")));
    }

    #[test]
    fn test_parse_valid_draft_arguments() {
        let args = r#"{
            "answer": "An answer.",
            "reflection": {"missing": "m", "superfluous": "s"},
            "search_queries": ["q1", "q2"]
        }"#;

        let proposal =
            parse_tool_arguments(AnswerSchema::Draft, "call_1".to_string(), args).unwrap();
        assert_eq!(proposal.id, "call_1");
        assert_eq!(proposal.search_queries.len(), 2);
        assert!(proposal.references.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_tool_arguments(AnswerSchema::Draft, "c".to_string(), "not json")
            .unwrap_err();
        assert!(matches!(err, AppError::Completion(_)));
    }

    #[test]
    fn test_parse_rejects_missing_references_on_revised() {
        let args = r#"{
            "answer": "a",
            "reflection": {"missing": "", "superfluous": ""},
            "search_queries": ["q"]
        }"#;

        let err =
            parse_tool_arguments(AnswerSchema::Revised, "c".to_string(), args).unwrap_err();
        assert!(err.to_string().contains("references"));
    }

    #[test]
    fn test_parse_rejects_too_many_queries() {
        let args = r#"{
            "answer": "a",
            "reflection": {"missing": "", "superfluous": ""},
            "search_queries": ["1", "2", "3", "4"]
        }"#;

        let err = parse_tool_arguments(AnswerSchema::Draft, "c".to_string(), args).unwrap_err();
        assert!(err.to_string().contains("at most 3"));
    }
}
