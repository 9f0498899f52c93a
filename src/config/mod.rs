//! Configuration system (layered: code > env > .env file).

pub mod server;

pub use server::{Environment, ServerConfig};

use std::collections::HashMap;
use std::fmt;

/// Provider credentials and endpoint overrides.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct VoxaConfig {
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
}

impl fmt::Debug for VoxaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<&str> = self.api_keys.keys().map(|k| k.as_str()).collect();
        providers.sort_unstable();
        f.debug_struct("VoxaConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .finish()
    }
}

const API_KEY_VARS: [(&str, &str); 2] = [
    ("ANTHROPIC_API_KEY", "anthropic"),
    ("OPENAI_API_KEY", "openai"),
];

const BASE_URL_VARS: [(&str, &str); 2] = [
    ("ANTHROPIC_BASE_URL", "anthropic"),
    ("OPENAI_BASE_URL", "openai"),
];

impl VoxaConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (ANTHROPIC_API_KEY, OPENAI_API_KEY, ...).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        for (var, provider) in API_KEY_VARS {
            if let Some(key) = lookup(var).filter(|k| !k.is_empty()) {
                config.set_api_key(provider, key);
            }
        }
        for (var, provider) in BASE_URL_VARS {
            if let Some(url) = lookup(var).filter(|u| !u.is_empty()) {
                config.set_base_url(provider, url);
            }
        }

        config
    }

    pub fn set_api_key(&mut self, provider: &str, key: impl Into<String>) {
        self.api_keys.insert(provider.to_string(), key.into());
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.get(provider).cloned()
    }

    pub fn set_base_url(&mut self, provider: &str, url: impl Into<String>) {
        self.base_urls.insert(provider.to_string(), url.into());
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.get(provider).cloned()
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.api_keys.contains_key(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            pairs
                .iter()
                .find(|(k, _)| *k == var)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn lookup_maps_env_vars_to_providers() {
        let vars = [
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("OPENAI_API_KEY", "sk-oai"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1"),
        ];
        let config = VoxaConfig::from_lookup(lookup_from(&vars));

        assert_eq!(config.get_api_key("anthropic").as_deref(), Some("sk-ant"));
        assert_eq!(config.get_api_key("openai").as_deref(), Some("sk-oai"));
        assert_eq!(
            config.get_base_url("openai").as_deref(),
            Some("http://localhost:9999/v1")
        );
        assert_eq!(config.get_base_url("anthropic"), None);
    }

    #[test]
    fn empty_values_are_ignored() {
        let vars = [("ANTHROPIC_API_KEY", "")];
        let config = VoxaConfig::from_lookup(lookup_from(&vars));

        assert!(!config.has_credentials("anthropic"));
    }

    #[test]
    fn explicit_key_overrides_loaded_key() {
        let vars = [("OPENAI_API_KEY", "from-env")];
        let mut config = VoxaConfig::from_lookup(lookup_from(&vars));
        config.set_api_key("openai", "explicit");

        assert_eq!(config.get_api_key("openai").as_deref(), Some("explicit"));
    }

    #[test]
    fn debug_output_hides_key_values() {
        let mut config = VoxaConfig::new();
        config.set_api_key("anthropic", "super-secret");

        let rendered = format!("{config:?}");
        assert!(rendered.contains("anthropic"));
        assert!(!rendered.contains("super-secret"));
    }
}
