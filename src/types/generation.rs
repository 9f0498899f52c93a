//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}

impl FinishReason {
    /// Map a provider stop-reason string onto a finish reason.
    pub fn from_provider(raw: &str) -> Option<Self> {
        match raw {
            "stop" | "end_turn" | "stop_sequence" => Some(Self::Stop),
            "length" | "max_tokens" => Some(Self::Length),
            "tool_calls" | "tool_use" => Some(Self::ToolCalls),
            "content_filter" => Some(Self::ContentFilter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_stop_reasons_normalise() {
        assert_eq!(FinishReason::from_provider("end_turn"), Some(FinishReason::Stop));
        assert_eq!(FinishReason::from_provider("tool_use"), Some(FinishReason::ToolCalls));
        assert_eq!(FinishReason::from_provider("max_tokens"), Some(FinishReason::Length));
        assert_eq!(FinishReason::from_provider("pause_turn"), None);
    }

    #[test]
    fn builder_leaves_unset_fields_empty() {
        let settings = GenerationSettings::builder()
            .temperature(0.2)
            .max_tokens(256)
            .build();
        assert_eq!(settings.temperature, Some(0.2));
        assert_eq!(settings.max_tokens, Some(256));
        assert_eq!(settings.top_p, None);
    }
}
