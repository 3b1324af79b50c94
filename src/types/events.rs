//! Caller-dialect stream events

use serde::{Deserialize, Serialize};

/// Incremental text carried by a delta event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDelta {
    pub text: String,
}

/// Event yielded to callers, serialized as
/// `{"type":"content_block_delta","delta":{"text":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    ContentBlockDelta { delta: TextDelta },
}

impl StreamEvent {
    pub fn content_block_delta(text: impl Into<String>) -> Self {
        Self::ContentBlockDelta {
            delta: TextDelta { text: text.into() },
        }
    }

    /// Delta text of this event (may be empty)
    pub fn text(&self) -> &str {
        match self {
            Self::ContentBlockDelta { delta } => &delta.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_caller_shape() {
        let v = serde_json::to_value(StreamEvent::content_block_delta("hi")).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"type": "content_block_delta", "delta": {"text": "hi"}})
        );
    }
}
