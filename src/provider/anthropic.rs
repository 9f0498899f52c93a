//! Anthropic Messages API provider.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::VoxaError;
use crate::models::anthropic::AnthropicModel;
use crate::models::ModelCapabilities;
use crate::types::*;

use super::http::{anthropic_headers, drain_lines, parse_sse_data, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

pub struct AnthropicProvider {
    model: AnthropicModel,
    api_key: String,
    base_url: String,
    capabilities: ModelCapabilities,
}

impl AnthropicProvider {
    pub fn new(model: AnthropicModel, api_key: String, base_url: Option<String>) -> Self {
        let capabilities = model.capabilities();
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
            capabilities,
        }
    }

    fn build_request_body(&self, request: &ProviderRequest, stream: bool) -> Value {
        let mut system_parts = Vec::new();
        let mut messages: Vec<Value> = Vec::new();

        for msg in &request.messages {
            let role = match msg.role {
                Role::System => {
                    system_parts.push(msg.text());
                    continue;
                }
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            if msg.content.is_empty() {
                continue;
            }
            // The Messages API rejects two consecutive turns from the same role.
            if let Some(last) = messages.last_mut() {
                if last["role"] == role {
                    let merged = format!("{}\n\n{}", last["content"].as_str().unwrap_or(""), msg.content);
                    last["content"] = merged.into();
                    continue;
                }
            }
            messages.push(json!({ "role": role, "content": msg.content }));
        }

        let max_tokens = request.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let max_tokens = match self.capabilities.max_output_tokens {
            Some(cap) => max_tokens.min(cap),
            None => max_tokens,
        };

        let mut obj = Map::new();
        obj.insert("model".into(), self.model.as_str().into());
        obj.insert("messages".into(), messages.into());
        obj.insert("max_tokens".into(), max_tokens.into());
        obj.insert("stream".into(), stream.into());

        if !system_parts.is_empty() {
            obj.insert("system".into(), system_parts.join("\n").into());
        }
        if let Some(temp) = request.settings.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            obj.insert("stop_sequences".into(), json!(stops));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "input_schema": t.parameters,
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
            }
        }

        Value::Object(obj)
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, VoxaError> {
        let url = format!("{}/messages", self.base_url);
        let resp = shared_client()
            .post(&url)
            .headers(anthropic_headers(&self.api_key, API_VERSION))
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
impl ModelProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, VoxaError> {
        let body = self.build_request_body(request, false);
        debug!(model = self.model.as_str(), "Anthropic generate_text");

        let data: AnthropicResponse = self.post(&body).await?.json().await?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for block in data.content {
            match block.r#type.as_str() {
                "text" => {
                    if let Some(t) = block.text {
                        text.push_str(&t);
                    }
                }
                "tool_use" => {
                    if let (Some(id), Some(name)) = (block.id, block.name) {
                        tool_calls.push(AgentToolCall {
                            id,
                            name,
                            arguments: block.input.unwrap_or_else(|| json!({})),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(ProviderResponse {
            text,
            usage: Usage::new(data.usage.input_tokens, data.usage.output_tokens),
            tool_calls,
            finish_reason: data.stop_reason.as_deref().and_then(FinishReason::from_provider),
        })
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, VoxaError>>, VoxaError> {
        let body = self.build_request_body(request, true);
        debug!(model = self.model.as_str(), "Anthropic stream_text");

        let byte_stream = self.post(&body).await?.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut usage = Usage::default();
            let mut finish: Option<FinishReason> = None;
            futures::pin_mut!(byte_stream);

            'outer: while let Some(chunk_result) = byte_stream.next().await {
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
                    let Ok(event) = serde_json::from_str::<Value>(data) else {
                        continue;
                    };
                    match event.get("type").and_then(|t| t.as_str()).unwrap_or("") {
                        "message_start" => {
                            if let Some(n) = event.pointer("/message/usage/input_tokens").and_then(|v| v.as_u64()) {
                                usage.input_tokens = n as u32;
                            }
                        }
                        "content_block_delta" => {
                            let delta = &event["delta"];
                            if delta["type"] == "text_delta" {
                                if let Some(text) = delta["text"].as_str().filter(|t| !t.is_empty()) {
                                    yield Ok(TextStreamDelta::text(text));
                                }
                            }
                        }
                        "message_delta" => {
                            if let Some(reason) = event.pointer("/delta/stop_reason").and_then(|s| s.as_str()) {
                                finish = FinishReason::from_provider(reason);
                            }
                            if let Some(n) = event.pointer("/usage/output_tokens").and_then(|v| v.as_u64()) {
                                usage.output_tokens = n as u32;
                            }
                        }
                        "message_stop" => {
                            usage.total_tokens = usage.input_tokens + usage.output_tokens;
                            yield Ok(TextStreamDelta::done(finish.take().or(Some(FinishReason::Stop)), Some(usage.clone())));
                            break 'outer;
                        }
                        "error" => {
                            let message = event
                                .pointer("/error/message")
                                .and_then(|m| m.as_str())
                                .unwrap_or("unknown stream error");
                            yield Err(VoxaError::Stream(message.to_string()));
                            break 'outer;
                        }
                        _ => {}
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

// Internal Anthropic response types

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    r#type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<Value>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ToolDefinition;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicModel::Claude3Haiku, "test-key".to_string(), None)
    }

    #[test]
    fn system_messages_are_lifted_out_of_the_turn_list() {
        let request = ProviderRequest {
            messages: vec![
                ModelMessage::system("You are helpful."),
                ModelMessage::user("hello"),
                ModelMessage::assistant("hi"),
            ],
            settings: GenerationSettings::builder().temperature(0.7).build(),
            tools: None,
        };
        let body = provider().build_request_body(&request, false);

        assert_eq!(body["system"], "You are helpful.");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn consecutive_user_turns_are_merged() {
        let request = ProviderRequest {
            messages: vec![ModelMessage::user("first"), ModelMessage::user("second")],
            ..Default::default()
        };
        let body = provider().build_request_body(&request, true);

        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["content"], "first\n\nsecond");
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn max_tokens_is_clamped_to_model_limit() {
        let request = ProviderRequest {
            messages: vec![ModelMessage::user("hi")],
            settings: GenerationSettings::builder().max_tokens(100_000).build(),
            tools: Some(vec![ToolDefinition {
                name: "get_current_time".into(),
                description: "time".into(),
                parameters: json!({"type": "object", "properties": {}}),
            }]),
        };
        let body = provider().build_request_body(&request, false);

        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
    }
}
