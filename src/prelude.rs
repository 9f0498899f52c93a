//! Convenience re-exports for common use.

pub use crate::agent::{AgentConfig, AgentSession, SessionRegistry, ToolCallRecord, TurnOutcome};
pub use crate::config::VoxaConfig;
pub use crate::error::{Result, VoxaError};
pub use crate::models::LanguageModel;
pub use crate::provider::{ModelProvider, ProviderRegistry};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolRegistry};
pub use crate::types::{GenerationSettings, ModelMessage, Role, TextStreamDelta};
