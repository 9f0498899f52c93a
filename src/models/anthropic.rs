//! Anthropic model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capabilities::ModelCapabilities;

/// Anthropic models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AnthropicModel {
    #[strum(serialize = "claude-sonnet-4-20250514")]
    ClaudeSonnet4,
    #[strum(serialize = "claude-3-7-sonnet-20250219")]
    Claude37Sonnet,
    #[strum(serialize = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet,
    #[strum(serialize = "claude-3-5-haiku-20241022")]
    Claude35Haiku,
    #[strum(serialize = "claude-3-opus-20240229")]
    Claude3Opus,
    #[strum(serialize = "claude-3-haiku-20240307")]
    Claude3Haiku,
    /// Custom/unknown Anthropic model by ID.
    #[strum(default)]
    Custom(String),
}

impl AnthropicModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClaudeSonnet4 => "claude-sonnet-4-20250514",
            Self::Claude37Sonnet => "claude-3-7-sonnet-20250219",
            Self::Claude35Sonnet => "claude-3-5-sonnet-20241022",
            Self::Claude35Haiku => "claude-3-5-haiku-20241022",
            Self::Claude3Opus => "claude-3-opus-20240229",
            Self::Claude3Haiku => "claude-3-haiku-20240307",
            Self::Custom(s) => s,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        let max_output = match self {
            Self::ClaudeSonnet4 | Self::Claude37Sonnet => 64_000,
            Self::Claude35Sonnet | Self::Claude35Haiku => 8_192,
            Self::Claude3Opus | Self::Claude3Haiku => 4_096,
            Self::Custom(_) => 4_096,
        };
        ModelCapabilities {
            max_output_tokens: Some(max_output),
            ..ModelCapabilities::full(200_000)
        }
    }
}
