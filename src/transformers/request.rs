//! Request transformation
//!
//! Converts caller-dialect requests into the provider's wire request.

use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, qualify_model};
use crate::types::{
    ChatMessage, ChatRequest, MessageRole, ProviderMessage, ProviderRequest, ProviderRole,
};

/// Transform a caller-dialect chat request into a provider-specific payload
pub trait RequestTransformer: Send + Sync {
    /// Provider identifier (e.g., "openrouter")
    fn provider_id(&self) -> &str;

    /// Transform a ChatRequest into the provider's wire request
    fn transform_chat(&self, req: &ChatRequest) -> ProviderRequest;
}

/// Request transformer for OpenRouter's chat completions endpoint.
///
/// The translation is deterministic: no timestamps, ids, or random state
/// are added, so equal inputs serialize to equal bytes.
#[derive(Debug, Clone)]
pub struct OpenRouterRequestTransformer {
    default_model: String,
}

impl OpenRouterRequestTransformer {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
        }
    }

    /// Map a caller message; only `assistant` survives, every other role becomes `user`.
    fn map_message(msg: &ChatMessage) -> ProviderMessage {
        let role = match msg.role {
            MessageRole::Assistant => ProviderRole::Assistant,
            _ => ProviderRole::User,
        };
        ProviderMessage {
            role,
            content: msg.content.clone(),
        }
    }
}

impl RequestTransformer for OpenRouterRequestTransformer {
    fn provider_id(&self) -> &str {
        "openrouter"
    }

    fn transform_chat(&self, req: &ChatRequest) -> ProviderRequest {
        let model = qualify_model(req.model.as_deref().unwrap_or(&self.default_model));

        let mut messages = Vec::with_capacity(req.messages.len() + 1);
        if let Some(system) = &req.system {
            messages.push(ProviderMessage {
                role: ProviderRole::System,
                content: system.clone(),
            });
        }
        messages.extend(req.messages.iter().map(Self::map_message));

        ProviderRequest {
            model,
            messages,
            stream: true,
            temperature: req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}
