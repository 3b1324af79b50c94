//! # taskmaster-llm
//!
//! Streaming chat completions through OpenRouter, exposed behind an
//! Anthropic-style `messages().create(..)` facade so callers written for an
//! Anthropic streaming client run unchanged.
//!
#![deny(unsafe_code)]

//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use taskmaster_llm::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENROUTER_API_KEY when no key is given explicitly
//!     let client = OpenRouterClient::builder().build()?;
//!
//!     let request = ChatRequest::new(vec![ChatMessage::user("Break this PRD into tasks")])
//!         .with_system("You are a project planner.");
//!     let mut stream = client.messages().create(&request).await?;
//!     while let Some(event) = stream.next().await {
//!         print!("{}", event?.text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod streaming;
pub mod telemetry;
pub mod transformers;
pub mod types;
pub mod utils;

pub use adapters::{MessageStream, Messages};
pub use builder::OpenRouterBuilder;
pub use client::OpenRouterClient;
pub use config::{ClientConfig, HttpConfig};
pub use error::LlmError;
pub use streaming::ChatStream;
pub use types::{ChatMessage, ChatRequest, MessageRole, StreamEvent};
pub use utils::CancelHandle;

/// Commonly used types
pub mod prelude {
    pub use crate::adapters::{MessageStream, Messages};
    pub use crate::builder::OpenRouterBuilder;
    pub use crate::client::OpenRouterClient;
    pub use crate::config::{ClientConfig, HttpConfig};
    pub use crate::error::LlmError;
    pub use crate::streaming::ChatStream;
    pub use crate::types::{ChatMessage, ChatRequest, MessageRole, StreamEvent, TextDelta};
    pub use crate::utils::CancelHandle;
}
