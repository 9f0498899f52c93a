//! OpenAI model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capabilities::ModelCapabilities;

/// OpenAI models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum OpenAiModel {
    #[strum(serialize = "gpt-4o")]
    Gpt4o,
    #[strum(serialize = "gpt-4o-mini")]
    Gpt4oMini,
    #[strum(serialize = "gpt-4-turbo")]
    Gpt4Turbo,
    #[strum(serialize = "gpt-4")]
    Gpt4,
    #[strum(serialize = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[strum(serialize = "o1")]
    O1,
    #[strum(serialize = "o1-mini")]
    O1Mini,
    /// Custom/unknown OpenAI model by ID.
    #[strum(default)]
    Custom(String),
}

impl OpenAiModel {
    /// Get the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt4 => "gpt-4",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::O1 => "o1",
            Self::O1Mini => "o1-mini",
            Self::Custom(s) => s,
        }
    }

    /// Whether this is a reasoning model.
    pub fn is_reasoning(&self) -> bool {
        match self {
            Self::O1 | Self::O1Mini => true,
            Self::Custom(id) => id.starts_with("o1"),
            _ => false,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        let (ctx, tools) = match self {
            Self::Gpt4o | Self::Gpt4oMini | Self::Gpt4Turbo => (128_000, true),
            Self::Gpt4 => (8_192, true),
            Self::Gpt35Turbo => (16_385, true),
            Self::O1 => (200_000, true),
            Self::O1Mini => (128_000, false),
            Self::Custom(_) => (128_000, true),
        };
        ModelCapabilities {
            supports_tools: tools,
            supports_streaming: true,
            supports_system_messages: !matches!(self, Self::O1Mini),
            context_length: ctx,
            max_output_tokens: Some(if self.is_reasoning() { 65_536 } else { 16_384 }),
        }
    }
}
