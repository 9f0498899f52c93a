//! A single agent session: persona, bound provider and tools, and history.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::error::{Result, VoxaError};
use crate::models::LanguageModel;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::{Tool, ToolArguments, ToolExecutionContext};
use crate::types::{AgentToolCall, GenerationSettings, ModelMessage, StreamEventType};

use super::config::AgentConfig;
use super::conversation::{Conversation, Turn};

/// Appended to every persona prompt. Replies are spoken aloud.
pub const VOICE_GUIDELINES: &str = "\
IMPORTANT VOICE AGENT GUIDELINES:
- Keep responses concise and conversational (1-3 sentences when possible)
- Do NOT use emojis, special characters, or markdown formatting
- Avoid bullet points or numbered lists - speak naturally
- Your responses will be converted to speech, so write as you would speak
- If you need to convey multiple points, do so in flowing sentences";

/// What happened when a requested tool ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutcome {
    Result(String),
    Error(String),
}

/// One dispatched tool call, serialized as `{tool, args, result}` or `{tool, args, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub args: serde_json::Value,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

impl ToolCallRecord {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }
}

/// Result of a complete (non-streamed) turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub text: String,
    /// `None` when the model requested no tools.
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

/// A stateful conversation bound to one persona, model and toolset.
///
/// Turns are serialized by `turn_lock`, held for the whole turn (including the
/// lifetime of a streamed reply). History sits behind a separate short-lived
/// lock so readers never wait for an in-flight turn.
pub struct AgentSession {
    id: String,
    config: AgentConfig,
    model: LanguageModel,
    provider: Arc<dyn ModelProvider>,
    tools: Vec<Arc<dyn Tool>>,
    system_prompt: String,
    settings: GenerationSettings,
    history: Mutex<Conversation>,
    turn_lock: Arc<tokio::sync::Mutex<()>>,
    cancel: CancellationToken,
}

impl AgentSession {
    pub fn new(
        id: impl Into<String>,
        config: AgentConfig,
        provider: Arc<dyn ModelProvider>,
        tools: Vec<Arc<dyn Tool>>,
        cancel: CancellationToken,
    ) -> Self {
        let id = id.into();
        let model = config.language_model();
        if !tools.is_empty() && !provider.capabilities().supports_tools {
            warn!(
                session_id = %id,
                model = %model,
                "Model does not accept tools, bound tools will not be offered"
            );
        }
        Self {
            system_prompt: format!("{}\n\n{}", config.system_prompt, VOICE_GUIDELINES),
            settings: config.settings(),
            id,
            config,
            model,
            provider,
            tools,
            history: Mutex::new(Conversation::new()),
            turn_lock: Arc::new(tokio::sync::Mutex::new(())),
            cancel,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    pub fn greeting(&self) -> Option<&str> {
        self.config.greeting.as_deref()
    }

    /// Names of the bound tools, in binding order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Snapshot of the history. Does not wait for an in-flight turn.
    pub fn history(&self) -> Vec<Turn> {
        self.conversation().turns().to_vec()
    }

    /// Empty the history once any in-flight turn has finished.
    pub async fn clear_history(&self) {
        let _turn = self.turn_lock.lock().await;
        self.conversation().clear();
        debug!(session_id = %self.id, "Cleared conversation history");
    }

    /// Abort in-flight work and refuse further turns.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a complete turn, dispatching at most one round of tool calls.
    pub async fn chat(&self, message: impl Into<String>) -> Result<TurnOutcome> {
        let message = message.into();
        let span = self.turn_span("chat");

        async move {
            let _turn = tokio::select! {
                _ = self.cancel.cancelled() => return Err(VoxaError::Cancelled),
                guard = self.turn_lock.lock() => guard,
            };

            let messages = self.begin_turn(&message);
            let (text, tool_calls) = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(VoxaError::Cancelled),
                result = self.complete(messages) => result?,
            };

            self.conversation().add_assistant_message(text.clone());
            Ok(TurnOutcome { text, tool_calls })
        }
        .instrument(span)
        .await
    }

    /// Stream a reply fragment by fragment. Tools are bound but never dispatched.
    ///
    /// The stream is lazy: nothing happens until it is first polled. Dropping it
    /// early commits whatever text was already yielded as the assistant turn.
    pub fn stream(self: &Arc<Self>, message: impl Into<String>) -> BoxStream<'static, Result<String>> {
        let session = Arc::clone(self);
        let message = message.into();
        let span = self.turn_span("stream");

        let stream = async_stream::stream! {
            let cancel = session.cancel.clone();
            let lock = Arc::clone(&session.turn_lock);
            let guard = tokio::select! {
                _ = cancel.cancelled() => None,
                guard = lock.lock_owned() => Some(guard),
            };
            let Some(guard) = guard else {
                yield Err(VoxaError::Cancelled);
                return;
            };

            let messages = session.begin_turn(&message);
            let mut pending = PendingTurn::new(Arc::clone(&session), guard);
            let request = session.request(messages);

            let opened = session
                .provider
                .stream_text(&request)
                .instrument(span.clone())
                .await;
            let mut deltas = match opened {
                Ok(deltas) => deltas,
                Err(e) => {
                    pending.abandon();
                    yield Err(e);
                    return;
                }
            };

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    next = deltas.next() => next,
                };
                match next {
                    None => break,
                    Some(Ok(delta)) => {
                        if delta.event_type == StreamEventType::Done || delta.text.is_empty() {
                            continue;
                        }
                        pending.push(&delta.text);
                        yield Ok(delta.text);
                    }
                    Some(Err(e)) => {
                        warn!(parent: &span, error = %e, "Provider stream failed");
                        pending.finish_after_error();
                        yield Err(e);
                        return;
                    }
                }
            }

            pending.commit();
        };

        Box::pin(stream)
    }

    fn turn_span(&self, mode: &'static str) -> Span {
        info_span!(
            "turn",
            session_id = %self.id,
            turn_id = %Uuid::new_v4(),
            mode,
            model = %self.model,
        )
    }

    fn conversation(&self) -> MutexGuard<'_, Conversation> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append the user turn and build the prompt for it.
    fn begin_turn(&self, message: &str) -> Vec<ModelMessage> {
        let mut history = self.conversation();
        history.add_user_message(message);
        self.prompt(&history)
    }

    fn prompt(&self, history: &Conversation) -> Vec<ModelMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ModelMessage::system(self.system_prompt.clone()));
        messages.extend(history.to_messages());
        messages
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() || !self.provider.capabilities().supports_tools {
            return None;
        }
        Some(self.tools.iter().map(|t| t.definition()).collect())
    }

    fn request(&self, messages: Vec<ModelMessage>) -> ProviderRequest {
        ProviderRequest {
            messages,
            settings: self.settings.clone(),
            tools: self.tool_definitions(),
        }
    }

    async fn complete(
        &self,
        messages: Vec<ModelMessage>,
    ) -> Result<(String, Option<Vec<ToolCallRecord>>)> {
        let request = self.request(messages);
        debug!(tools = self.tools.len(), "Invoking provider");
        let response = self.provider.generate_text(&request).await?;

        if response.tool_calls.is_empty() {
            return Ok((response.text, None));
        }

        let records = self.dispatch(&response.tool_calls).await;
        let summary = serde_json::to_string(&records)?;

        let mut followup = request;
        followup.messages = {
            let history = self.conversation();
            self.prompt(&history)
        };
        followup.messages.push(ModelMessage::user(format!(
            "Tool results: {summary}. Please provide your response."
        )));

        debug!(records = records.len(), "Re-invoking provider with tool results");
        let response = self.provider.generate_text(&followup).await?;
        if !response.tool_calls.is_empty() {
            debug!(
                count = response.tool_calls.len(),
                "Ignoring tool calls requested after tool results"
            );
        }
        Ok((response.text, Some(records)))
    }

    async fn dispatch(&self, calls: &[AgentToolCall]) -> Vec<ToolCallRecord> {
        let ctx = ToolExecutionContext::for_session(self.id.clone());
        let mut records = Vec::with_capacity(calls.len());

        for call in calls {
            let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
                debug!(tool = %call.name, "Model requested an unbound tool, skipping");
                continue;
            };
            let args = ToolArguments::new(call.arguments.clone());
            debug!(tool = %call.name, "Executing tool");
            let outcome = match tool.execute(&args, &ctx).await {
                Ok(result) => ToolOutcome::Result(result),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool execution failed");
                    ToolOutcome::Error(e.to_string())
                }
            };
            records.push(ToolCallRecord {
                tool: call.name.clone(),
                args: args.raw().clone(),
                outcome,
            });
        }

        records
    }
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}

/// Text of a streamed turn that has not been committed yet.
///
/// Holds the turn lock until dropped. Dropping without an explicit decision
/// commits the accumulated text, which covers a caller that stops reading.
struct PendingTurn {
    session: Arc<AgentSession>,
    text: String,
    forwarded: bool,
    settled: bool,
    _turn: OwnedMutexGuard<()>,
}

impl PendingTurn {
    fn new(session: Arc<AgentSession>, turn: OwnedMutexGuard<()>) -> Self {
        Self {
            session,
            text: String::new(),
            forwarded: false,
            settled: false,
            _turn: turn,
        }
    }

    fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.forwarded = true;
    }

    fn commit(&mut self) {
        if self.settled {
            return;
        }
        self.settled = true;
        let text = std::mem::take(&mut self.text);
        self.session.conversation().add_assistant_message(text);
    }

    fn abandon(&mut self) {
        self.settled = true;
    }

    /// Keep partial output only if some of it reached the caller.
    fn finish_after_error(&mut self) {
        if self.forwarded {
            self.commit();
        } else {
            self.abandon();
        }
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        self.commit();
    }
}
