//! Error Handling Module
//!
//! This module provides error handling for the client, including:
//! - Core error type (`LlmError`)
//! - HTTP failure classification into `LlmError::ApiError`
//! - Conversions from transport errors
//!
//! # Example
//!
//! ```rust,ignore
//! use taskmaster_llm::error::LlmError;
//!
//! let error = LlmError::api_error(404, "Not found");
//! assert_eq!(error.status_code(), Some(404));
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
