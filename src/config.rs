//! OpenRouter Configuration
//!
//! Holds the endpoint, credential, and default model used by one client.
//! A `ClientConfig` is normalised at construction and never mutated once it
//! has been handed to a client.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;

/// Canonical OpenRouter API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Namespace prepended to model ids that carry no `provider/` qualifier
pub const DEFAULT_NAMESPACE: &str = "anthropic";

/// Baseline model used when none is configured
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Value sent in the `HTTP-Referer` identification header
pub const APP_REFERER: &str = "https://github.com/taskmaster-ai/taskmaster";

/// Value sent in the `X-Title` identification header
pub const APP_TITLE: &str = "Task Master CLI";

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 64_000;

/// Environment variables consulted by [`ClientConfig::from_env`] and the builder
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";
pub const MODEL_ENV: &str = "OPENROUTER_MODEL";

/// Ensure a model id carries a namespace qualifier.
///
/// Ids without a `/` get [`DEFAULT_NAMESPACE`] prepended; qualified ids pass
/// through unchanged. Both the configured default and per-request models go
/// through this function.
pub fn qualify_model(model: &str) -> String {
    if model.contains('/') {
        model.to_string()
    } else {
        format!("{DEFAULT_NAMESPACE}/{model}")
    }
}

/// Transport settings applied when the client builds its own `reqwest::Client`.
///
/// No timeout is imposed unless one is set here.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// User agent
    pub user_agent: Option<String>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

/// OpenRouter client configuration.
///
/// # Example
/// ```rust,ignore
/// use taskmaster_llm::config::ClientConfig;
///
/// let config = ClientConfig::new("sk-or-...").with_default_model("claude-3-5-haiku");
/// assert_eq!(config.default_model(), "anthropic/claude-3-5-haiku");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: SecretString,
    base_url: String,
    default_model: String,
    http_config: HttpConfig,
}

impl ClientConfig {
    /// Create a configuration with the canonical endpoint and baseline model.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: qualify_model(DEFAULT_MODEL),
            http_config: HttpConfig::default(),
        }
    }

    /// Read the credential, endpoint, and model from the environment.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(format!("{API_KEY_ENV} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(url) = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(model) = std::env::var(MODEL_ENV).ok().filter(|v| !v.is_empty()) {
            config = config.with_default_model(model);
        }
        config.validate()?;
        Ok(config)
    }

    /// Override the API base URL. A trailing `/` is dropped.
    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Override the default model; the id is namespace-qualified if needed.
    pub fn with_default_model<S: Into<String>>(mut self, model: S) -> Self {
        self.default_model = qualify_model(&model.into());
        self
    }

    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn http_config(&self) -> &HttpConfig {
        &self.http_config
    }

    /// Full URL of the chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Get the authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key.expose_secret())
    }

    pub(crate) fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), LlmError> {
        if !self.has_api_key() {
            return Err(LlmError::MissingApiKey(
                "API key cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::ConfigurationError(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }
}
