//! Streaming
//!
//! Turns a provider's incremental byte stream into a lazy sequence of
//! caller events.

mod codec;
mod factory;

pub use codec::RecordCodec;
pub use factory::{MAX_RECORD_LEN, StreamFactory};

use crate::error::LlmError;
use crate::types::StreamEvent;
use futures_util::Stream;
use std::pin::Pin;

/// Lazy, finite, non-restartable sequence of caller events
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;
