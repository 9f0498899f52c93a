//! Route handlers.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::{ApiError, AppState};
use crate::agent::{AgentConfig, ToolCallRecord, TurnRole};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub session_id: String,
    pub system_prompt: String,
    pub greeting: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub tools: Option<Vec<String>>,
    pub preset: Option<String>,
}

impl CreateAgentRequest {
    fn into_config(self) -> (String, AgentConfig) {
        let config = AgentConfig::builder()
            .system_prompt(self.system_prompt)
            .maybe_greeting(self.greeting)
            .maybe_model(self.model)
            .maybe_temperature(self.temperature)
            .maybe_max_tokens(self.max_tokens)
            .maybe_tools(self.tools)
            .maybe_preset(self.preset)
            .build();
        (self.session_id, config)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAgentResponse {
    pub session_id: String,
    pub status: String,
    pub greeting: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: TurnRole,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolInfo>,
    pub presets: BTreeMap<String, Vec<String>>,
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "voxa" }))
}

/// GET /tools: every registered tool and preset.
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolsResponse> {
    let registry = state.sessions.tools();
    let tools = registry
        .tools()
        .map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().schema.clone(),
        })
        .collect();
    Json(ToolsResponse {
        tools,
        presets: registry.presets().clone(),
    })
}

/// POST /agents/create
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAgentRequest>,
) -> ApiResult<CreateAgentResponse> {
    let (session_id, config) = req.into_config();
    let session = state.sessions.create(session_id, config).await?;
    Ok(Json(CreateAgentResponse {
        session_id: session.id().to_string(),
        status: "created".to_string(),
        greeting: session.greeting().map(str::to_string),
    }))
}

/// POST /agents/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let session = state.sessions.get(&req.session_id).await?;
    let outcome = session.chat(req.message).await?;
    Ok(Json(ChatResponse {
        session_id: req.session_id,
        response: outcome.text,
        tool_calls: outcome.tool_calls,
    }))
}

/// POST /agents/stream: Server-Sent Events, one event per fragment.
///
/// Ends with `[DONE]`, or `[ERROR] <message>` if the provider fails mid-turn.
pub async fn stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let session = state.sessions.get(&req.session_id).await?;
    let session_id = req.session_id;
    let mut fragments = session.stream(req.message);

    let events = async_stream::stream! {
        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => yield Ok(Event::default().data(fragment.replace('\r', ""))),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Stream ended with error");
                    yield Ok(Event::default().data(format!("[ERROR] {e}").replace('\r', "")));
                    return;
                }
            }
        }
        yield Ok(Event::default().data("[DONE]"));
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// DELETE /agents/:session_id
pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusResponse> {
    state.sessions.delete(&session_id).await?;
    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
        session_id,
    }))
}

/// GET /agents/:session_id/history
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<HistoryResponse> {
    let session = state.sessions.get(&session_id).await?;
    let messages = session
        .history()
        .into_iter()
        .map(|turn| HistoryMessage {
            role: turn.role,
            content: turn.content,
        })
        .collect();
    Ok(Json(HistoryResponse {
        session_id,
        messages,
    }))
}

/// DELETE /agents/:session_id/history
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusResponse> {
    let session = state.sessions.get(&session_id).await?;
    session.clear_history().await;
    Ok(Json(StatusResponse {
        status: "cleared".to_string(),
        session_id,
    }))
}
