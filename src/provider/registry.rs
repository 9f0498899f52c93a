//! Provider registry for dynamic provider resolution.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ModelProvider, ProviderFactory};
use crate::config::VoxaConfig;
use crate::error::VoxaError;
use crate::models::LanguageModel;

/// Registry mapping provider keys to their factories, plus the credentials they use.
///
/// Sessions resolve their completion backend through this at creation time.
pub struct ProviderRegistry {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
    config: VoxaConfig,
}

impl ProviderRegistry {
    pub fn new(config: VoxaConfig) -> Self {
        Self {
            factories: HashMap::new(),
            config,
        }
    }

    /// Registry with every provider compiled into this build.
    pub fn with_defaults(config: VoxaConfig) -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new(config);
        #[cfg(feature = "anthropic")]
        registry.register(Arc::new(super::factory::AnthropicFactory));
        #[cfg(feature = "openai")]
        registry.register(Arc::new(super::factory::OpenAiFactory));
        registry
    }

    /// Register a factory for all provider keys it declares.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        for key in factory.provider_keys() {
            self.factories.insert(key.to_string(), factory.clone());
        }
    }

    /// Create a provider instance by looking up the registered factory.
    pub fn create_provider(
        &self,
        model: &LanguageModel,
    ) -> Result<Box<dyn ModelProvider>, VoxaError> {
        let key = model.provider_name();
        self.factories
            .get(key)
            .ok_or_else(|| {
                VoxaError::Configuration(format!("No provider factory registered for '{key}'"))
            })?
            .create(&self.config, model)
    }

    /// Check whether a factory is registered for the given key.
    pub fn has_provider(&self, provider_key: &str) -> bool {
        self.factories.contains_key(provider_key)
    }

    /// List all registered provider keys.
    pub fn provider_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    pub fn config(&self) -> &VoxaConfig {
        &self.config
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(VoxaConfig::default())
    }
}
