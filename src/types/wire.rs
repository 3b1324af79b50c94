//! OpenRouter wire-dialect types (OpenAI chat completions shape)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: ProviderRole,
    pub content: String,
}

/// Body of `POST {base}/chat/completions`.
///
/// Field order is fixed so the same request always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<ProviderMessage>,
    pub stream: bool,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// One decoded `data:` record of the completion stream.
///
/// `choices` is required: records without it are not treated as deltas.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderChunk {
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ProviderChunk {
    /// Text of the first choice's delta, empty when absent
    pub fn delta_text(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.delta.as_ref())
            .and_then(|d| d.content.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_defaults_to_empty() {
        let chunk: ProviderChunk = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(chunk.delta_text(), "");

        let chunk: ProviderChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(chunk.delta_text(), "");

        let chunk: ProviderChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":null}}]}"#).unwrap();
        assert_eq!(chunk.delta_text(), "");
    }

    #[test]
    fn delta_text_reads_first_choice() {
        let chunk: ProviderChunk = serde_json::from_str(
            r#"{"id":"gen-1","choices":[{"index":0,"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.delta_text(), "a");
    }

    #[test]
    fn missing_choices_is_rejected() {
        let parsed = serde_json::from_str::<ProviderChunk>(r#"{"usage":{"total_tokens":3}}"#);
        assert!(parsed.is_err());
    }
}
