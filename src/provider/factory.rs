//! Provider factory trait and the built-in factories.

use super::ModelProvider;
use crate::config::VoxaConfig;
use crate::error::VoxaError;
use crate::models::LanguageModel;

/// Factory for creating ModelProvider instances for a resolved model.
pub trait ProviderFactory: Send + Sync {
    /// Provider key(s) this factory handles (e.g., &["anthropic"]).
    fn provider_keys(&self) -> &[&str];

    /// Create a ModelProvider for the given model and config.
    fn create(
        &self,
        config: &VoxaConfig,
        model: &LanguageModel,
    ) -> Result<Box<dyn ModelProvider>, VoxaError>;
}

fn require_key(config: &VoxaConfig, model: &LanguageModel) -> Result<String, VoxaError> {
    let key = model.provider_key();
    config
        .get_api_key(key.as_str())
        .ok_or_else(|| VoxaError::Authentication(format!("Missing {}", key.api_key_var())))
}

/// Builds Anthropic Messages API providers.
#[cfg(feature = "anthropic")]
pub struct AnthropicFactory;

#[cfg(feature = "anthropic")]
impl ProviderFactory for AnthropicFactory {
    fn provider_keys(&self) -> &[&str] {
        &["anthropic"]
    }

    fn create(
        &self,
        config: &VoxaConfig,
        model: &LanguageModel,
    ) -> Result<Box<dyn ModelProvider>, VoxaError> {
        let LanguageModel::Anthropic(m) = model else {
            return Err(VoxaError::Configuration(format!(
                "anthropic factory cannot serve {model}"
            )));
        };
        let api_key = require_key(config, model)?;
        Ok(Box::new(super::anthropic::AnthropicProvider::new(
            m.clone(),
            api_key,
            config.get_base_url("anthropic"),
        )))
    }
}

/// Builds OpenAI Chat Completions providers.
#[cfg(feature = "openai")]
pub struct OpenAiFactory;

#[cfg(feature = "openai")]
impl ProviderFactory for OpenAiFactory {
    fn provider_keys(&self) -> &[&str] {
        &["openai"]
    }

    fn create(
        &self,
        config: &VoxaConfig,
        model: &LanguageModel,
    ) -> Result<Box<dyn ModelProvider>, VoxaError> {
        let LanguageModel::OpenAi(m) = model else {
            return Err(VoxaError::Configuration(format!(
                "openai factory cannot serve {model}"
            )));
        };
        let api_key = require_key(config, model)?;
        Ok(Box::new(super::openai::OpenAiProvider::new(
            m.clone(),
            api_key,
            config.get_base_url("openai"),
        )))
    }
}
