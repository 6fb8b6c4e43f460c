use crate::llm::client::{parse_tool_arguments, AnswerSchema, CompletionClient};
use crate::prompts::PromptAssembler;
use crate::types::{AppError, Proposal, Result, Turn};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionNamedToolChoice,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall, FunctionName,
    },
    Client,
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

/// Completion client backed by the OpenAI chat completions API.
///
/// Structured output is enforced with tool calling: each request exposes a
/// single tool matching the requested [`AnswerSchema`] and pins
/// `tool_choice` to it, so the model cannot answer with free text.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    assembler: PromptAssembler,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: String, assembler: PromptAssembler) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model,
            assembler,
        }
    }

    /// Map the turn history onto OpenAI chat messages.
    ///
    /// Proposals become assistant turns carrying a tool call; tool-result
    /// turns answer that call under the same id, which is what the API
    /// requires for the model to associate results with its own queries.
    fn history_to_messages(&self, history: &[Turn]) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(history.len());

        for turn in history {
            match turn {
                Turn::Question { content } => {
                    messages.push(ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessage::from(content.clone()),
                    ));
                }
                Turn::Proposal(proposal) => {
                    let tool_name = if proposal.is_revised() {
                        AnswerSchema::Revised.tool_name()
                    } else {
                        AnswerSchema::Draft.tool_name()
                    };

                    let mut arguments = json!({
                        "answer": proposal.answer,
                        "reflection": proposal.reflection,
                        "search_queries": proposal.search_queries,
                    });
                    if let Some(references) = &proposal.references {
                        arguments["references"] = json!(references);
                    }

                    let message = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(vec![ChatCompletionMessageToolCall {
                            id: proposal.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: tool_name.to_string(),
                                arguments: arguments.to_string(),
                            },
                        }])
                        .build()
                        .map_err(|e| {
                            AppError::Completion(format!("Failed to build message: {}", e))
                        })?;
                    messages.push(ChatCompletionRequestMessage::Assistant(message));
                }
                Turn::ToolResults(results) => {
                    let content = serde_json::to_string(&results.outputs).map_err(|e| {
                        AppError::Completion(format!("Failed to serialize tool results: {}", e))
                    })?;

                    let message = ChatCompletionRequestToolMessageArgs::default()
                        .content(content)
                        .tool_call_id(results.proposal_id.clone())
                        .build()
                        .map_err(|e| {
                            AppError::Completion(format!("Failed to build message: {}", e))
                        })?;
                    messages.push(ChatCompletionRequestMessage::Tool(message));
                }
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn propose(&self, schema: AnswerSchema, history: &[Turn]) -> Result<Proposal> {
        let system = self
            .assembler
            .system_prompt(schema.prompt_role(), Utc::now());

        let mut messages = vec![ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage::from(system),
        )];
        messages.extend(self.history_to_messages(history)?);

        let tool = ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: async_openai::types::FunctionObject {
                name: schema.tool_name().to_string(),
                description: Some(match schema {
                    AnswerSchema::Draft => "Answer the question.".to_string(),
                    AnswerSchema::Revised => {
                        "Revise your original answer to your question.".to_string()
                    }
                }),
                parameters: Some(schema.parameters()),
                strict: None,
            },
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .tools(vec![tool])
            .tool_choice(ChatCompletionToolChoiceOption::Named(
                ChatCompletionNamedToolChoice {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionName {
                        name: schema.tool_name().to_string(),
                    },
                },
            ))
            .build()
            .map_err(|e| AppError::Completion(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Completion(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Completion("No response from OpenAI".to_string()))?;

        let call = choice
            .message
            .tool_calls
            .and_then(|calls| calls.into_iter().next())
            .ok_or_else(|| {
                AppError::Completion(format!(
                    "Model did not call {} despite forced tool choice",
                    schema.tool_name()
                ))
            })?;

        parse_tool_arguments(schema, call.id, &call.function.arguments)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
