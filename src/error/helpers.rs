//! HTTP error classification helpers

use super::LlmError;
use serde_json::Value;

/// Build an `LlmError::ApiError` from a failed provider response.
///
/// The message is `"{label} API error: {reason}"`, where `reason` is taken from
/// the body's top-level `message`, then from the `error.message` envelope,
/// then from the status' canonical reason phrase.
pub fn classify_http_error(
    label: &str,
    status: u16,
    body_text: &str,
    canonical_reason: Option<&str>,
) -> LlmError {
    let parsed = serde_json::from_str::<Value>(body_text).ok();
    let reason = parsed
        .as_ref()
        .and_then(extract_error_message)
        .or_else(|| canonical_reason.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));

    let details = parsed.unwrap_or_else(|| serde_json::json!({ "raw": body_text }));
    LlmError::api_error_with_details(status, format!("{label} API error: {reason}"), details)
}

fn extract_error_message(body: &Value) -> Option<String> {
    let top_level = body.get("message").and_then(Value::as_str);
    let nested = || {
        body.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
    };
    top_level
        .or_else(nested)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
