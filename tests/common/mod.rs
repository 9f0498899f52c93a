//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::BoxStream;

use voxa::agent::SessionRegistry;
use voxa::config::VoxaConfig;
use voxa::error::VoxaError;
use voxa::models::{LanguageModel, ModelCapabilities};
use voxa::provider::{ModelProvider, ProviderFactory, ProviderRegistry, ProviderRequest, ProviderResponse};
use voxa::tools::{AgentTool, AgentToolParameters, ToolRegistry};
use voxa::types::*;

/// Clock reading returned by the fixed `get_current_time` override.
pub const FIXED_TIME: &str = "Monday, January 01, 2024 at 12:00 PM";

/// One scripted reply for `generate_text`.
pub enum Reply {
    Text(String),
    ToolCalls(Vec<AgentToolCall>),
    Fail(u16, String),
}

/// One scripted reply for `stream_text`.
pub enum StreamReply {
    /// Yield these fragments, then finish.
    Fragments(Vec<String>),
    /// Yield these fragments, then fail.
    FailAfter(Vec<String>, String),
    /// Yield these fragments, then never finish.
    Hang(Vec<String>),
    /// Fail before any fragment.
    Refuse(u16, String),
}

/// A mock provider that returns scripted responses and records every request.
pub struct MockProvider {
    model_id: String,
    capabilities: ModelCapabilities,
    replies: Mutex<VecDeque<Reply>>,
    streams: Mutex<VecDeque<StreamReply>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Arc<Self> {
        Arc::new(Self {
            model_id: model_id.to_string(),
            capabilities: ModelCapabilities::full(128_000),
            replies: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Reply::Text(text.to_string()));
    }

    /// Queue a single tool call response.
    pub fn queue_tool_call(&self, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![(name, args)]);
    }

    pub fn queue_tool_calls(&self, calls: Vec<(&str, serde_json::Value)>) {
        let calls = calls
            .into_iter()
            .enumerate()
            .map(|(i, (name, arguments))| AgentToolCall {
                id: format!("call_{i}"),
                name: name.to_string(),
                arguments,
            })
            .collect();
        self.replies.lock().unwrap().push_back(Reply::ToolCalls(calls));
    }

    pub fn queue_failure(&self, status: u16, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(status, message.to_string()));
    }

    pub fn queue_stream(&self, reply: StreamReply) {
        self.streams.lock().unwrap().push_back(reply);
    }

    pub fn queue_fragments(&self, fragments: &[&str]) {
        self.queue_stream(StreamReply::Fragments(
            fragments.iter().map(|f| f.to_string()).collect(),
        ));
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, request: &ProviderRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, VoxaError> {
        self.record(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            None => Ok(ProviderResponse {
                text: "Mock response".to_string(),
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }),
            Some(Reply::Text(text)) => Ok(ProviderResponse {
                text,
                usage: Usage::new(10, 20),
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }),
            Some(Reply::ToolCalls(tool_calls)) => Ok(ProviderResponse {
                usage: Usage::new(10, 5),
                tool_calls,
                finish_reason: Some(FinishReason::ToolCalls),
                ..Default::default()
            }),
            Some(Reply::Fail(status, message)) => Err(VoxaError::api(status, message)),
        }
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, VoxaError>>, VoxaError> {
        self.record(request);
        let reply = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| StreamReply::Fragments(vec!["Mock streamed response".into()]));

        let (fragments, ending) = match reply {
            StreamReply::Refuse(status, message) => return Err(VoxaError::api(status, message)),
            StreamReply::Fragments(f) => (f, None),
            StreamReply::FailAfter(f, message) => (f, Some(Some(message))),
            StreamReply::Hang(f) => (f, Some(None)),
        };

        let stream = async_stream::stream! {
            for fragment in fragments {
                tokio::task::yield_now().await;
                yield Ok(TextStreamDelta::text(fragment));
            }
            match ending {
                None => {
                    yield Ok(TextStreamDelta::done(Some(FinishReason::Stop), Some(Usage::new(10, 20))));
                }
                Some(Some(message)) => {
                    yield Err(VoxaError::Stream(message));
                }
                Some(None) => futures::future::pending::<()>().await,
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Hands out the shared mock for every model it is asked to build.
pub struct MockFactory {
    provider: Arc<MockProvider>,
}

struct SharedMock(Arc<MockProvider>);

#[async_trait]
impl ModelProvider for SharedMock {
    fn provider_name(&self) -> &str {
        self.0.provider_name()
    }

    fn model_id(&self) -> &str {
        self.0.model_id()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        self.0.capabilities()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, VoxaError> {
        self.0.generate_text(request).await
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, VoxaError>>, VoxaError> {
        self.0.stream_text(request).await
    }
}

impl ProviderFactory for MockFactory {
    fn provider_keys(&self) -> &[&str] {
        &["anthropic", "openai"]
    }

    fn create(
        &self,
        _config: &VoxaConfig,
        _model: &LanguageModel,
    ) -> Result<Box<dyn ModelProvider>, VoxaError> {
        Ok(Box::new(SharedMock(Arc::clone(&self.provider))))
    }
}

/// Built-in tools with a clock that always reads [`FIXED_TIME`].
pub fn fixed_clock_tools() -> ToolRegistry {
    let mut tools = ToolRegistry::builtin();
    tools.register(Arc::new(AgentTool::sync(
        "get_current_time",
        "Get the current date and time.",
        AgentToolParameters::empty(),
        |_| Ok(FIXED_TIME.to_string()),
    )));
    tools
}

/// Session registry whose every provider is `mock`.
pub fn registry_with(mock: &Arc<MockProvider>) -> SessionRegistry {
    registry_with_tools(mock, fixed_clock_tools())
}

pub fn registry_with_tools(mock: &Arc<MockProvider>, tools: ToolRegistry) -> SessionRegistry {
    let mut providers = ProviderRegistry::new(VoxaConfig::new());
    providers.register(Arc::new(MockFactory {
        provider: Arc::clone(mock),
    }));
    SessionRegistry::new(Arc::new(tools), Arc::new(providers))
}

/// Registry that cannot build any provider.
pub fn registry_without_providers() -> SessionRegistry {
    SessionRegistry::new(
        Arc::new(ToolRegistry::builtin()),
        Arc::new(ProviderRegistry::new(VoxaConfig::new())),
    )
}

/// Collect `(role, content)` pairs for compact history assertions.
pub fn transcript(session: &voxa::agent::AgentSession) -> Vec<(String, String)> {
    session
        .history()
        .into_iter()
        .map(|turn| (turn.role.to_string(), turn.content))
        .collect()
}
