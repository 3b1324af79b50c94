//! Caller-dialect adapters
//!
//! Facades that expose the OpenRouter pipeline in the shape callers of
//! another provider's SDK already expect.

pub mod anthropic;

pub use anthropic::{MessageStream, Messages};
