//! Model capability flags.

use serde::{Deserialize, Serialize};

/// What a model accepts in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub supports_tools: bool,
    pub supports_streaming: bool,
    pub supports_system_messages: bool,
    pub context_length: u32,
    pub max_output_tokens: Option<u32>,
}

impl ModelCapabilities {
    /// Capabilities of a general chat model with tool support.
    pub fn full(context_length: u32) -> Self {
        Self {
            supports_tools: true,
            supports_streaming: true,
            supports_system_messages: true,
            context_length,
            max_output_tokens: None,
        }
    }
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self::full(8_192)
    }
}
