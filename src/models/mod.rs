//! Model definitions and selection.

pub mod anthropic;
pub mod capabilities;
pub mod openai;
pub mod provider_key;
pub mod selector;

pub use capabilities::ModelCapabilities;
pub use provider_key::ProviderKey;
pub use selector::ModelSelector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level language model enum, dispatching to provider-specific variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    Anthropic(anthropic::AnthropicModel),
    OpenAi(openai::OpenAiModel),
}

impl LanguageModel {
    /// Model used when a model name matches no known family.
    pub fn fallback() -> Self {
        Self::Anthropic(anthropic::AnthropicModel::Claude3Haiku)
    }

    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            Self::Anthropic(m) => m.as_str(),
            Self::OpenAi(m) => m.as_str(),
        }
    }

    /// Provider that serves this model.
    pub fn provider_key(&self) -> ProviderKey {
        match self {
            Self::Anthropic(_) => ProviderKey::Anthropic,
            Self::OpenAi(_) => ProviderKey::OpenAi,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_key().as_str()
    }

    /// Get capabilities for this model.
    pub fn capabilities(&self) -> ModelCapabilities {
        match self {
            Self::Anthropic(m) => m.capabilities(),
            Self::OpenAi(m) => m.capabilities(),
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}
