//! Shared HTTP client, SSE parsing, and auth utilities.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::VoxaError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Build Anthropic-style headers (x-api-key).
pub fn anthropic_headers(api_key: &str, version: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert("x-api-key", val);
    }
    if let Ok(val) = HeaderValue::from_str(version) {
        headers.insert("anthropic-version", val);
    }
    headers
}

/// Parse an SSE "data:" line, returning None for "[DONE]".
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line
        .strip_prefix("data: ")
        .or_else(|| line.strip_prefix("data:"))?;
    if data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Pop every complete line out of `buffer`, leaving any partial tail behind.
///
/// Works on raw bytes so a multi-byte character split across network chunks
/// is only decoded once its line is complete.
pub fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = buffer.drain(..=line_end).collect();
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        if !line.is_empty() && !line.starts_with(':') {
            lines.push(line);
        }
    }
    lines
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> VoxaError {
    match status {
        401 | 403 => VoxaError::Authentication(body.to_string()),
        429 => VoxaError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => VoxaError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_data_lines_skip_done_marker() {
        assert_eq!(parse_sse_data("data: {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(parse_sse_data("data:{}"), Some("{}"));
        assert_eq!(parse_sse_data("data: [DONE]"), None);
        assert_eq!(parse_sse_data("event: ping"), None);
    }

    #[test]
    fn drain_lines_keeps_partial_tail() {
        let mut buffer = b"data: one\n: comment\n\ndata: tw".to_vec();
        assert_eq!(drain_lines(&mut buffer), vec!["data: one".to_string()]);
        assert_eq!(buffer, b"data: tw");
    }

    #[test]
    fn characters_split_across_chunks_survive() {
        let line = "data: It\u{2019}s\n".as_bytes();
        let split = line.iter().position(|&b| b == 0xE2).unwrap() + 1;

        let mut buffer = line[..split].to_vec();
        assert!(drain_lines(&mut buffer).is_empty());
        buffer.extend_from_slice(&line[split..]);
        assert_eq!(drain_lines(&mut buffer), vec!["data: It\u{2019}s".to_string()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn status_mapping_extracts_retry_hint() {
        let err = status_to_error(429, r#"{"error":{"retry_after":1.5}}"#);
        assert!(matches!(err, VoxaError::RateLimited { retry_after_ms: Some(1500) }));
        assert!(matches!(status_to_error(401, "nope"), VoxaError::Authentication(_)));
        assert!(matches!(status_to_error(500, "boom"), VoxaError::Api { status: 500, .. }));
    }
}
