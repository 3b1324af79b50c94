//! OpenRouter client builder
//!
//! Resolution order for each setting is: explicit builder call, then the
//! environment, then the built-in default.

use std::time::Duration;

use crate::client::OpenRouterClient;
use crate::config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, HttpConfig, MODEL_ENV};
use crate::error::LlmError;

/// Builder for [`OpenRouterClient`].
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use taskmaster_llm::OpenRouterClient;
///
/// # fn example() -> Result<(), taskmaster_llm::LlmError> {
/// let client = OpenRouterClient::builder()
///     .api_key("sk-or-...")
///     .model("claude-3-5-haiku-20241022")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct OpenRouterBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    http_config: HttpConfig,
    http_client: Option<reqwest::Client>,
}

impl OpenRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL (e.g. a self-hosted gateway or a test server)
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default model. Ids without a `provider/` prefix are qualified.
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.http_config.user_agent = Some(user_agent.into());
        self
    }

    /// Add a custom header
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.http_config.headers.insert(key.into(), value.into());
        self
    }

    /// Use a preconfigured HTTP client. Timeouts and user agent set on this
    /// builder are then ignored; custom headers still apply.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Resolve settings into a [`ClientConfig`] without building a client.
    pub fn build_config(&self) -> Result<ClientConfig, LlmError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env_non_empty(API_KEY_ENV))
            .ok_or_else(|| {
                LlmError::MissingApiKey(format!(
                    "OpenRouter API key not provided and {API_KEY_ENV} is not set"
                ))
            })?;

        let mut config = ClientConfig::new(api_key).with_http_config(self.http_config.clone());
        if let Some(url) = self.base_url.clone().or_else(|| env_non_empty(BASE_URL_ENV)) {
            config = config.with_base_url(url);
        }
        if let Some(model) = self.model.clone().or_else(|| env_non_empty(MODEL_ENV)) {
            config = config.with_default_model(model);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the client
    pub fn build(self) -> Result<OpenRouterClient, LlmError> {
        let config = self.build_config()?;
        tracing::debug!(
            base_url = %config.base_url(),
            model = %config.default_model(),
            "Built OpenRouter client"
        );
        match self.http_client {
            Some(http_client) => Ok(OpenRouterClient::with_http_client(config, http_client)),
            None => OpenRouterClient::new(config),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
