//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::VoxaError;
use crate::models::openai::OpenAiModel;
use crate::models::ModelCapabilities;
use crate::types::*;

use super::http::{bearer_headers, drain_lines, parse_sse_data, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: OpenAiModel,
    api_key: String,
    base_url: String,
    capabilities: ModelCapabilities,
}

impl OpenAiProvider {
    pub fn new(model: OpenAiModel, api_key: String, base_url: Option<String>) -> Self {
        let capabilities = model.capabilities();
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
            capabilities,
        }
    }

    fn build_request_body(&self, request: &ProviderRequest, stream: bool) -> Value {
        let messages = request
            .messages
            .iter()
            .map(|m| self.message_to_openai(m))
            .collect::<Vec<_>>();

        let mut obj = Map::new();
        obj.insert("model".into(), self.model.as_str().into());
        obj.insert("messages".into(), messages.into());
        obj.insert("stream".into(), stream.into());

        if let Some(max) = request.settings.max_tokens {
            // Reasoning models reject max_tokens.
            let key = if self.model.is_reasoning() {
                "max_completion_tokens"
            } else {
                "max_tokens"
            };
            obj.insert(key.into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            if !self.model.is_reasoning() {
                obj.insert("temperature".into(), temp.into());
            }
        }
        if let Some(top_p) = request.settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            obj.insert("stop".into(), json!(stops));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() && self.capabilities.supports_tools {
                let tool_defs: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
            }
        }

        Value::Object(obj)
    }

    fn message_to_openai(&self, msg: &ModelMessage) -> Value {
        let role = match msg.role {
            Role::System if self.capabilities.supports_system_messages => "system",
            Role::System | Role::User => "user",
            Role::Assistant => "assistant",
        };
        json!({ "role": role, "content": msg.content })
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, VoxaError> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, VoxaError> {
        let body = self.build_request_body(request, false);
        debug!(model = self.model.as_str(), "OpenAI generate_text");

        let data: OpenAiChatResponse = self.post(&body).await?.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| VoxaError::api(200, "No choices in OpenAI response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| AgentToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(Value::String(tc.function.arguments)),
            })
            .collect();

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: data
                .usage
                .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            tool_calls,
            finish_reason: choice
                .finish_reason
                .as_deref()
                .and_then(FinishReason::from_provider),
        })
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, VoxaError>>, VoxaError> {
        let body = self.build_request_body(request, true);
        debug!(model = self.model.as_str(), "OpenAI stream_text");

        let byte_stream = self.post(&body).await?.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(VoxaError::Network(e));
                        break;
                    }
                };

                buffer.extend_from_slice(&chunk);

                for line in drain_lines(&mut buffer) {
                    let Some(data) = parse_sse_data(&line) else {
                        continue;
                    };
                    let Ok(chunk) = serde_json::from_str::<OpenAiStreamChunk>(data) else {
                        debug!(data, "Skipping unparseable OpenAI stream chunk");
                        continue;
                    };
                    let usage = chunk.usage.map(|u| Usage::new(u.prompt_tokens, u.completion_tokens));
                    let Some(choice) = chunk.choices.into_iter().next() else {
                        continue;
                    };
                    if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                        yield Ok(TextStreamDelta::text(text));
                    }
                    if let Some(reason) = choice.finish_reason.as_deref() {
                        yield Ok(TextStreamDelta::done(FinishReason::from_provider(reason), usage));
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    choices: Vec<OpenAiStreamChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiStreamDelta {
    content: Option<String>,
}
