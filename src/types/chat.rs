//! Caller-dialect chat types
//!
//! These mirror the shape callers already use for Anthropic-style
//! `messages.create` requests: a flat message list plus an optional
//! top-level system prompt.

use serde::{Deserialize, Serialize};

/// Role of a caller message.
///
/// Roles other than `user` and `assistant` are accepted and kept verbatim in
/// `Other`; the wire dialect only distinguishes `assistant` from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    #[serde(untagged)]
    Other(String),
}

impl From<&str> for MessageRole {
    fn from(role: &str) -> Self {
        match role {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A single caller message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<MessageRole>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Caller-dialect chat request.
///
/// Unset sampling parameters fall back to the client defaults during
/// translation; an unset model falls back to the configured default model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(
        default,
        alias = "maxTokens",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_caller_json() {
        let req: ChatRequest = serde_json::from_str(
            r#"{
                "model": "claude-3-5-haiku",
                "system": "be brief",
                "max_tokens": 1000,
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"},
                    {"role": "tool", "content": "result"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(req.model.as_deref(), Some("claude-3-5-haiku"));
        assert_eq!(req.max_tokens, Some(1000));
        assert_eq!(req.temperature, None);
        assert_eq!(req.messages[0].role, MessageRole::User);
        assert_eq!(req.messages[1].role, MessageRole::Assistant);
        assert_eq!(req.messages[2].role, MessageRole::Other("tool".into()));
    }

    #[test]
    fn accepts_camel_case_max_tokens() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages": [], "maxTokens": 42}"#).unwrap();
        assert_eq!(req.max_tokens, Some(42));
    }

    #[test]
    fn other_role_serializes_verbatim() {
        let msg = ChatMessage::new("system", "x");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "system");
        assert_eq!(serde_json::to_value(ChatMessage::user("x")).unwrap()["role"], "user");
    }
}
