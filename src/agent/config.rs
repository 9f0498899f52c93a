//! Per-session agent configuration.

use std::sync::Arc;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::models::{LanguageModel, ModelSelector};
use crate::tools::{Tool, ToolRegistry};
use crate::types::GenerationSettings;

/// Model used when a session does not name one.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Persona, model and toolset captured when a session is created.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct AgentConfig {
    #[builder(into)]
    pub system_prompt: String,
    /// Returned to the caller at creation. Never part of the history.
    #[builder(into)]
    #[serde(default)]
    pub greeting: Option<String>,
    #[builder(into, default = DEFAULT_MODEL.to_string())]
    #[serde(default = "default_model")]
    pub model: String,
    #[builder(default = DEFAULT_TEMPERATURE)]
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[builder(default = DEFAULT_MAX_TOKENS)]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Tool names to bind. Unknown names are dropped.
    #[builder(default)]
    #[serde(default)]
    pub tools: Vec<String>,
    /// Industry preset used when `tools` is empty.
    #[builder(into)]
    #[serde(default)]
    pub preset: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl AgentConfig {
    pub fn language_model(&self) -> LanguageModel {
        ModelSelector::from_model_name(&self.model)
    }

    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
    }

    /// Tools to bind: explicit names first, then the preset, else none.
    pub fn resolve_tools(&self, registry: &ToolRegistry) -> Vec<Arc<dyn Tool>> {
        if !self.tools.is_empty() {
            return registry.resolve(&self.tools);
        }
        match self.preset.as_deref() {
            Some(preset) => registry.resolve_by_preset(preset),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_defaults_match_service_defaults() {
        let config = AgentConfig::builder().system_prompt("Be nice.").build();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1024);
        assert!(config.tools.is_empty());
        assert_eq!(config.greeting, None);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"system_prompt": "Hi", "tools": ["calculate"]}"#).unwrap();
        assert_eq!(
            config,
            AgentConfig::builder()
                .system_prompt("Hi")
                .tools(vec!["calculate".to_string()])
                .build()
        );
    }

    #[test]
    fn explicit_tools_win_over_preset() {
        let registry = ToolRegistry::builtin();
        let config = AgentConfig::builder()
            .system_prompt("x")
            .tools(vec!["calculate".to_string()])
            .preset("restaurant")
            .build();
        let names: Vec<_> = config
            .resolve_tools(&registry)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["calculate"]);

        let preset_only = AgentConfig::builder().system_prompt("x").preset("sales").build();
        assert_eq!(preset_only.resolve_tools(&registry).len(), 4);

        let none = AgentConfig::builder().system_prompt("x").build();
        assert!(none.resolve_tools(&registry).is_empty());
    }

    #[test]
    fn settings_carry_sampling_parameters() {
        let config = AgentConfig::builder()
            .system_prompt("x")
            .temperature(0.2)
            .max_tokens(64)
            .build();
        let settings = config.settings();
        assert_eq!(settings.temperature, Some(0.2));
        assert_eq!(settings.max_tokens, Some(64));
    }
}
