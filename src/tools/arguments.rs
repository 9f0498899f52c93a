//! Typed access to tool call arguments.

use serde_json::Value;

use crate::error::VoxaError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    /// Wrap raw arguments. Providers sometimes send the object as a JSON string.
    pub fn new(value: Value) -> Self {
        let value = match value {
            Value::String(raw) if raw.trim().starts_with('{') => {
                serde_json::from_str(raw.trim()).unwrap_or(Value::String(raw))
            }
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, VoxaError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| VoxaError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument. Empty strings count as absent.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Get an integer argument. Numeric strings are accepted.
    pub fn get_i64(&self, key: &str) -> Result<i64, VoxaError> {
        let missing = || VoxaError::InvalidArgument(format!("Missing integer argument: {key}"));
        match self.value.get(key) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(missing),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| missing()),
            _ => Err(missing()),
        }
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, VoxaError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            VoxaError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_encoded_objects_are_unwrapped() {
        let args = ToolArguments::new(json!("{\"order_id\": \"12345\"}"));
        assert_eq!(args.get_str("order_id").unwrap(), "12345");
    }

    #[test]
    fn integers_accept_numeric_strings() {
        let args = ToolArguments::new(json!({"a": 4, "b": " 6 ", "c": "six"}));
        assert_eq!(args.get_i64("a").unwrap(), 4);
        assert_eq!(args.get_i64("b").unwrap(), 6);
        assert!(matches!(args.get_i64("c"), Err(VoxaError::InvalidArgument(_))));
    }

    #[test]
    fn missing_and_empty_optionals() {
        let args = ToolArguments::new(serde_json::Value::Null);
        assert!(args.get_str("x").is_err());
        let args = ToolArguments::new(json!({"category": ""}));
        assert_eq!(args.get_str_opt("category"), None);
    }
}
