//! Model selection and parsing.

use std::str::FromStr;

use tracing::warn;

use super::anthropic::AnthropicModel;
use super::openai::OpenAiModel;
use super::{LanguageModel, ProviderKey};
use crate::error::VoxaError;

/// Resolves user-supplied model names to a `LanguageModel`.
pub struct ModelSelector;

impl ModelSelector {
    /// Pick a model family from a bare model name.
    ///
    /// Names starting with `claude` go to Anthropic, `gpt` or `o1` go to OpenAI.
    /// Anything else falls back to Claude 3 Haiku.
    pub fn from_model_name(name: &str) -> LanguageModel {
        let name = name.trim();
        if name.starts_with("claude") {
            LanguageModel::Anthropic(anthropic_model(name))
        } else if name.starts_with("gpt") || name.starts_with("o1") {
            LanguageModel::OpenAi(openai_model(name))
        } else {
            let fallback = LanguageModel::fallback();
            warn!(requested = name, fallback = %fallback, "Unrecognized model name, using fallback");
            fallback
        }
    }

    /// Parse "provider:model_id" into a LanguageModel.
    ///
    /// Examples: "openai:gpt-4o", "anthropic:claude-3-haiku-20240307"
    pub fn parse(s: &str) -> Result<LanguageModel, VoxaError> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            VoxaError::InvalidArgument(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            ))
        })?;

        match ProviderKey::parse(provider) {
            Some(ProviderKey::Anthropic) => Ok(LanguageModel::Anthropic(anthropic_model(model_id))),
            Some(ProviderKey::OpenAi) => Ok(LanguageModel::OpenAi(openai_model(model_id))),
            None => Err(VoxaError::InvalidArgument(format!(
                "Unknown provider '{provider}'"
            ))),
        }
    }
}

fn anthropic_model(id: &str) -> AnthropicModel {
    AnthropicModel::from_str(id).unwrap_or(AnthropicModel::Custom(id.to_string()))
}

fn openai_model(id: &str) -> OpenAiModel {
    OpenAiModel::from_str(id).unwrap_or(OpenAiModel::Custom(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_names_select_anthropic() {
        let model = ModelSelector::from_model_name("claude-3-haiku-20240307");
        assert_eq!(model, LanguageModel::Anthropic(AnthropicModel::Claude3Haiku));

        let custom = ModelSelector::from_model_name("claude-future-1");
        assert_eq!(custom.provider_key(), ProviderKey::Anthropic);
        assert_eq!(custom.model_id(), "claude-future-1");
    }

    #[test]
    fn gpt_and_o1_names_select_openai() {
        assert_eq!(
            ModelSelector::from_model_name("gpt-4o"),
            LanguageModel::OpenAi(OpenAiModel::Gpt4o)
        );
        let o1 = ModelSelector::from_model_name("o1-preview");
        assert_eq!(o1.provider_key(), ProviderKey::OpenAi);
        assert_eq!(o1.model_id(), "o1-preview");
    }

    #[test]
    fn unknown_names_fall_back_to_haiku() {
        for name in ["llama3", "", "mistral-large"] {
            assert_eq!(ModelSelector::from_model_name(name), LanguageModel::fallback());
        }
        assert_eq!(LanguageModel::fallback().model_id(), "claude-3-haiku-20240307");
    }

    #[test]
    fn parse_requires_provider_prefix() {
        let model = ModelSelector::parse("openai:gpt-4o-mini").unwrap();
        assert_eq!(model, LanguageModel::OpenAi(OpenAiModel::Gpt4oMini));
        assert!(ModelSelector::parse("gpt-4o").is_err());
        assert!(ModelSelector::parse("gemini:pro").is_err());
    }

    #[test]
    fn reasoning_models_report_reduced_capabilities() {
        let caps = LanguageModel::OpenAi(OpenAiModel::O1Mini).capabilities();
        assert!(!caps.supports_tools);
        assert!(!caps.supports_system_messages);
        assert!(LanguageModel::fallback().capabilities().supports_tools);
    }
}
