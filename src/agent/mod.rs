//! Agent system: per-session conversations with tool execution.

pub mod agent;
pub mod config;
pub mod conversation;
pub mod session;

pub use agent::{AgentSession, ToolCallRecord, ToolOutcome, TurnOutcome, VOICE_GUIDELINES};
pub use config::AgentConfig;
pub use conversation::{Conversation, Turn, TurnRole};
pub use session::SessionRegistry;
