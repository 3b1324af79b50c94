//! Anthropic-compatible messages facade
//!
//! Lets code written against an Anthropic-style streaming client
//! (`client.messages().create(params)` returning an async sequence of
//! `content_block_delta` events) run unchanged on top of OpenRouter.
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//! use taskmaster_llm::prelude::*;
//!
//! let client = OpenRouterClient::builder().api_key("sk-or-...").build()?;
//! let request = ChatRequest::new(vec![ChatMessage::user("Summarize the task list")]);
//! let mut stream = client.messages().create(&request).await?;
//! while let Some(event) = stream.next().await {
//!     print!("{}", event?.text());
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};

use crate::client::OpenRouterClient;
use crate::error::LlmError;
use crate::streaming::ChatStream;
use crate::types::{ChatRequest, StreamEvent};
use crate::utils::cancel::{CancelHandle, make_cancellable_stream};

/// `messages` namespace of an [`OpenRouterClient`]
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a OpenRouterClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a OpenRouterClient) -> Self {
        Self { client }
    }

    /// Start a streaming completion and return its event sequence.
    ///
    /// Fails without producing a stream when the provider rejects the request.
    pub async fn create(&self, request: &ChatRequest) -> Result<MessageStream, LlmError> {
        let stream = self.client.create_chat_completion_stream(request).await?;
        Ok(MessageStream::new(stream))
    }
}

/// Event sequence returned by [`Messages::create`].
///
/// Yields events in arrival order without buffering or reordering. Dropping
/// it, or calling [`CancelHandle::cancel`] on its handle, closes the
/// underlying connection.
pub struct MessageStream {
    inner: ChatStream,
    cancel: CancelHandle,
}

impl MessageStream {
    pub fn new(stream: ChatStream) -> Self {
        let (inner, cancel) = make_cancellable_stream(stream);
        Self { inner, cancel }
    }

    /// Handle that ends this stream from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Drain the stream and concatenate every delta's text.
    pub async fn collect_text(mut self) -> Result<String, LlmError> {
        let mut text = String::new();
        while let Some(event) = self.next().await {
            text.push_str(event?.text());
        }
        Ok(text)
    }

    pub fn into_inner(self) -> ChatStream {
        self.inner
    }
}

impl Stream for MessageStream {
    type Item = Result<StreamEvent, LlmError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(texts: &[&'static str]) -> ChatStream {
        let items: Vec<Result<StreamEvent, LlmError>> = texts
            .iter()
            .map(|t| Ok(StreamEvent::content_block_delta(*t)))
            .collect();
        Box::pin(futures_util::stream::iter(items))
    }

    #[tokio::test]
    async fn passes_events_through_in_order() {
        let stream = MessageStream::new(events(&["a", "", "b"]));
        let out: Vec<_> = stream.map(|e| e.unwrap().text().to_string()).collect().await;
        assert_eq!(out, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn collect_text_concatenates() {
        let stream = MessageStream::new(events(&["Hel", "lo"]));
        assert_eq!(stream.collect_text().await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn collect_text_fails_on_error() {
        let items: Vec<Result<StreamEvent, LlmError>> = vec![
            Ok(StreamEvent::content_block_delta("a")),
            Err(LlmError::StreamError("boom".into())),
        ];
        let stream = MessageStream::new(Box::pin(futures_util::stream::iter(items)));
        assert!(matches!(
            stream.collect_text().await,
            Err(LlmError::StreamError(_))
        ));
    }

    #[tokio::test]
    async fn cancel_handle_ends_stream() {
        let mut stream = MessageStream::new(events(&["a", "b", "c"]));
        assert_eq!(stream.next().await.unwrap().unwrap().text(), "a");
        stream.cancel_handle().cancel();
        assert!(stream.next().await.is_none());
    }
}
