//! OpenRouter Client
//!
//! Issues streaming chat completion requests against OpenRouter and decodes
//! the response into caller-dialect events.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::adapters::anthropic::Messages;
use crate::builder::OpenRouterBuilder;
use crate::config::{APP_REFERER, APP_TITLE, ClientConfig};
use crate::error::{LlmError, classify_http_error};
use crate::streaming::{ChatStream, StreamFactory};
use crate::transformers::{
    OpenRouterChunkTransformer, OpenRouterRequestTransformer, RequestTransformer,
};
use crate::types::{ChatRequest, ProviderRequest};

/// Label used in error messages and logs
const PROVIDER_LABEL: &str = "OpenRouter";

/// OpenRouter chat completion client.
///
/// Cheap to clone; clones share the HTTP connection pool and the immutable
/// configuration. Requests are independent of each other.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http_client: reqwest::Client,
    config: Arc<ClientConfig>,
    request_transformer: OpenRouterRequestTransformer,
}

impl OpenRouterClient {
    /// Create a client, building a `reqwest::Client` from the config's HTTP settings.
    pub fn new(config: ClientConfig) -> Result<Self, LlmError> {
        let http_client = build_http_client(&config)?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        let request_transformer = OpenRouterRequestTransformer::new(config.default_model());
        Self {
            http_client,
            config: Arc::new(config),
            request_transformer,
        }
    }

    /// Start building a client; see [`OpenRouterBuilder`].
    pub fn builder() -> OpenRouterBuilder {
        OpenRouterBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Anthropic-style `messages` facade over this client.
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    /// Translate a caller request into the wire request that would be sent.
    pub fn build_request(&self, request: &ChatRequest) -> ProviderRequest {
        self.request_transformer.transform_chat(request)
    }

    fn build_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();

        for (name, value) in &self.config.http_config().headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid value for header '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let mut auth = HeaderValue::from_str(&self.config.auth_header())
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("http-referer"),
            HeaderValue::from_static(APP_REFERER),
        );
        headers.insert(
            HeaderName::from_static("x-title"),
            HeaderValue::from_static(APP_TITLE),
        );

        Ok(headers)
    }

    /// Issue a streaming chat completion.
    ///
    /// Resolves once the provider has answered with a success status; the
    /// returned stream then yields one event per delta record in arrival
    /// order. A non-success status fails here with `LlmError::ApiError` and
    /// no stream is produced.
    pub async fn create_chat_completion_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatStream, LlmError> {
        let result = self.send_stream_request(request).await;
        if let Err(e) = &result {
            tracing::error!("{PROVIDER_LABEL} streaming error: {e}");
        }
        result
    }

    async fn send_stream_request(&self, request: &ChatRequest) -> Result<ChatStream, LlmError> {
        let url = self.config.chat_completions_url();
        let body = self.build_request(request);
        let headers = self.build_headers()?;

        tracing::debug!(
            model = %body.model,
            url = %url,
            messages = body.messages.len(),
            "Sending streaming chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_error(
                PROVIDER_LABEL,
                status.as_u16(),
                &text,
                status.canonical_reason(),
            ));
        }

        Ok(StreamFactory::create_line_stream(
            response.bytes_stream(),
            OpenRouterChunkTransformer::new(),
        ))
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, LlmError> {
    let http = config.http_config();
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = http.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = http.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(user_agent) = &http.user_agent {
        builder = builder.user_agent(user_agent);
    }
    builder
        .build()
        .map_err(|e| LlmError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use tracing_test::traced_test;

    #[test]
    fn headers_include_identification_and_auth() {
        let client = OpenRouterClient::new(ClientConfig::new("test-key")).unwrap();
        let headers = client.build_headers().unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(
            headers["HTTP-Referer"],
            "https://github.com/taskmaster-ai/taskmaster"
        );
        assert_eq!(headers["X-Title"], "Task Master CLI");
    }

    #[test]
    fn custom_headers_cannot_override_auth() {
        let mut http = HttpConfig::default();
        http.headers
            .insert("Authorization".to_string(), "Bearer other".to_string());
        http.headers
            .insert("X-Request-Source".to_string(), "tests".to_string());
        let config = ClientConfig::new("test-key").with_http_config(http);
        let client = OpenRouterClient::new(config).unwrap();
        let headers = client.build_headers().unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
        assert_eq!(headers["x-request-source"], "tests");
    }

    #[test]
    fn invalid_custom_header_is_a_configuration_error() {
        let mut http = HttpConfig::default();
        http.headers.insert("bad header".to_string(), "x".to_string());
        let client =
            OpenRouterClient::new(ClientConfig::new("k").with_http_config(http)).unwrap();
        assert!(matches!(
            client.build_headers(),
            Err(LlmError::ConfigurationError(_))
        ));
    }

    #[test]
    fn build_request_uses_config_default_model() {
        let config = ClientConfig::new("k").with_default_model("claude-3-5-haiku");
        let client = OpenRouterClient::new(config).unwrap();
        let body = client.build_request(&ChatRequest::default());
        assert_eq!(body.model, "anthropic/claude-3-5-haiku");
        assert!(body.stream);
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_request_is_logged() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"message":"bad key"}"#)
            .create_async()
            .await;

        let config = ClientConfig::new("k").with_base_url(server.url());
        let client = OpenRouterClient::new(config).unwrap();
        let result = client
            .create_chat_completion_stream(&ChatRequest::default())
            .await;

        assert!(result.is_err());
        assert!(logs_contain(
            "OpenRouter streaming error: OpenRouter API error: bad key"
        ));
    }
}
