//! Transformers layer
//!
//! Traits and OpenRouter implementations for request and stream-record
//! transformation between the caller dialect and the wire dialect.

pub mod request;
pub mod stream;

pub use request::{OpenRouterRequestTransformer, RequestTransformer};
pub use stream::{OpenRouterChunkTransformer, RecordAction, StreamChunkTransformer};
