//! Process-wide table of live agent sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::agent::AgentSession;
use super::config::AgentConfig;
use crate::error::{Result, VoxaError};
use crate::provider::ProviderRegistry;
use crate::tools::ToolRegistry;

/// Sessions keyed by caller-chosen id.
///
/// Cheap to clone; clones share the same table. Sessions are never evicted.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    sessions: RwLock<HashMap<String, Arc<AgentSession>>>,
    tools: Arc<ToolRegistry>,
    providers: Arc<ProviderRegistry>,
    shutdown: CancellationToken,
}

impl SessionRegistry {
    pub fn new(tools: Arc<ToolRegistry>, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: RwLock::new(HashMap::new()),
                tools,
                providers,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.inner.tools
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.inner.providers
    }

    /// Build and register a session, replacing any session with the same id.
    ///
    /// Nothing is registered if the provider cannot be built.
    pub async fn create(
        &self,
        session_id: impl Into<String>,
        config: AgentConfig,
    ) -> Result<Arc<AgentSession>> {
        let session_id = session_id.into();
        let model = config.language_model();
        let provider = self.inner.providers.create_provider(&model)?;
        let tools = config.resolve_tools(&self.inner.tools);
        let session = Arc::new(AgentSession::new(
            session_id.clone(),
            config,
            Arc::from(provider),
            tools,
            self.inner.shutdown.child_token(),
        ));

        let replaced = self
            .inner
            .sessions
            .write()
            .await
            .insert(session_id.clone(), Arc::clone(&session));

        if let Some(old) = replaced {
            old.cancel();
            info!(session_id = %session_id, model = %model, "Replaced existing agent session");
        } else {
            info!(
                session_id = %session_id,
                model = %model,
                tools = ?session.tool_names(),
                "Created agent session"
            );
        }
        Ok(session)
    }

    pub async fn get(&self, session_id: &str) -> Result<Arc<AgentSession>> {
        self.inner
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| VoxaError::SessionNotFound(session_id.to_string()))
    }

    /// Remove a session and cancel its in-flight work.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        let removed = self.inner.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.cancel();
                info!(session_id, "Deleted agent session");
                Ok(())
            }
            None => Err(VoxaError::SessionNotFound(session_id.to_string())),
        }
    }

    /// Remove every session.
    pub async fn clear(&self) {
        let drained: Vec<_> = self.inner.sessions.write().await.drain().collect();
        for (_, session) in &drained {
            session.cancel();
        }
        info!(count = drained.len(), "Cleared agent sessions");
    }

    /// Cancel everything and empty the table. Sessions created afterwards start cancelled.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.clear().await;
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.sessions.read().await.is_empty()
    }

    /// Live session ids, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.sessions.read().await.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("tools", &self.inner.tools)
            .finish_non_exhaustive()
    }
}
