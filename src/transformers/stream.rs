//! Stream record transformation
//!
//! Converts one framed line of a provider stream into at most one caller event.

use crate::types::{ProviderChunk, StreamEvent};
use serde_json::Value;

/// Line that ends an OpenAI-style completion stream
pub const DONE_SENTINEL: &str = "data: [DONE]";

const DATA_PREFIX: &str = "data: ";

/// What the decoder should do with a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// Nothing to emit (blank, comment, or malformed record)
    Skip,
    /// Emit an event and keep reading
    Emit(StreamEvent),
    /// Termination sentinel: stop reading, the stream ended successfully
    Done,
}

/// Convert provider stream records to caller events
pub trait StreamChunkTransformer: Send + Sync {
    /// Provider identifier
    fn provider_id(&self) -> &str;

    /// Convert a single newline-delimited record
    fn convert_record(&self, record: &str) -> RecordAction;
}

/// Record transformer for OpenRouter's `data: <json>` lines.
///
/// Every record that parses as a completion chunk yields exactly one
/// `content_block_delta`, including chunks whose delta text is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRouterChunkTransformer;

impl OpenRouterChunkTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl StreamChunkTransformer for OpenRouterChunkTransformer {
    fn provider_id(&self) -> &str {
        "openrouter"
    }

    fn convert_record(&self, record: &str) -> RecordAction {
        let trimmed = record.trim();
        if trimmed.is_empty() {
            return RecordAction::Skip;
        }
        if trimmed == DONE_SENTINEL {
            return RecordAction::Done;
        }

        let line = record.trim_end_matches(['\r', '\n']);
        let payload = line.strip_prefix(DATA_PREFIX).unwrap_or(line);

        match serde_json::from_str::<ProviderChunk>(payload) {
            Ok(chunk) => RecordAction::Emit(StreamEvent::content_block_delta(chunk.delta_text())),
            Err(e) => {
                let upstream_error = serde_json::from_str::<Value>(payload)
                    .ok()
                    .and_then(|v| v.get("error").cloned());
                match upstream_error {
                    Some(error) => {
                        tracing::warn!(
                            %error,
                            "OpenRouter stream carried an error payload; skipping"
                        );
                    }
                    None => {
                        tracing::trace!(
                            record = %line,
                            error = %e,
                            "Skipping unparseable stream record"
                        );
                    }
                }
                RecordAction::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn convert(record: &str) -> RecordAction {
        OpenRouterChunkTransformer::new().convert_record(record)
    }

    #[test]
    fn emits_delta_text() {
        assert_eq!(
            convert(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#),
            RecordAction::Emit(StreamEvent::content_block_delta("hi"))
        );
    }

    #[test]
    fn emits_empty_delta() {
        assert_eq!(
            convert(r#"data: {"choices":[{"delta":{}}]}"#),
            RecordAction::Emit(StreamEvent::content_block_delta(""))
        );
        assert_eq!(
            convert(r#"data: {"choices":[]}"#),
            RecordAction::Emit(StreamEvent::content_block_delta(""))
        );
    }

    #[test]
    fn recognizes_sentinel() {
        assert_eq!(convert("data: [DONE]"), RecordAction::Done);
        assert_eq!(convert("data: [DONE]\r"), RecordAction::Done);
        assert_eq!(convert("  data: [DONE]  "), RecordAction::Done);
    }

    #[test]
    fn skips_blank_and_malformed_records() {
        assert_eq!(convert(""), RecordAction::Skip);
        assert_eq!(convert("   \r"), RecordAction::Skip);
        assert_eq!(convert("data: not-json"), RecordAction::Skip);
        assert_eq!(convert(": OPENROUTER PROCESSING"), RecordAction::Skip);
        assert_eq!(convert(r#"data: {"choices":[{"delta":{"content":"#), RecordAction::Skip);
    }

    #[test]
    fn skips_records_without_choices() {
        assert_eq!(
            convert(r#"data: {"error":{"message":"overloaded","code":502}}"#),
            RecordAction::Skip
        );
        assert_eq!(
            convert(r#"data: {"usage":{"total_tokens":10}}"#),
            RecordAction::Skip
        );
    }

    #[test]
    fn handles_crlf_and_unprefixed_json() {
        assert_eq!(
            convert("data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\r"),
            RecordAction::Emit(StreamEvent::content_block_delta("x"))
        );
        assert_eq!(
            convert(r#"{"choices":[{"delta":{"content":"y"}}]}"#),
            RecordAction::Emit(StreamEvent::content_block_delta("y"))
        );
    }

    #[test]
    #[traced_test]
    fn upstream_error_payload_is_logged() {
        convert(r#"data: {"error":{"message":"overloaded","code":502}}"#);
        assert!(logs_contain("OpenRouter stream carried an error payload"));
        assert!(logs_contain("overloaded"));
    }
}
