//! Stream Factory
//!
//! Frames a byte stream into newline-delimited records and hands each record
//! to a [`StreamChunkTransformer`]. Records may span any number of network
//! chunks; a final record without a trailing newline is still decoded.
//! Record bytes are decoded lossily, so invalid UTF-8 never ends the stream.

use crate::error::LlmError;
use crate::streaming::ChatStream;
use crate::streaming::codec::RecordCodec;
use crate::transformers::{RecordAction, StreamChunkTransformer};
use futures_util::{Stream, StreamExt, TryStreamExt};
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

/// Longest record decoded; longer records are discarded and logged
pub const MAX_RECORD_LEN: usize = 1024 * 1024;

/// Stream Factory
pub struct StreamFactory;

impl StreamFactory {
    /// Create a chat stream from a line-delimited byte stream.
    ///
    /// Events are yielded in record order, one per converted record. The
    /// stream ends after the termination sentinel (remaining bytes are not
    /// read) or when the body ends. Over-long records are dropped and
    /// decoding continues with the next record. Only a transport error while
    /// reading the body is terminal: it is yielded once as
    /// `LlmError::StreamError` and ends the stream.
    ///
    /// Dropping the returned stream drops `byte_stream`, which for an HTTP
    /// body releases the connection.
    pub fn create_line_stream<S, B, E, T>(byte_stream: S, transformer: T) -> ChatStream
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: bytes::Buf + Send + 'static,
        E: std::fmt::Display + Send + 'static,
        T: StreamChunkTransformer + 'static,
    {
        let byte_stream =
            byte_stream.map_err(|e| std::io::Error::other(format!("body read failed: {e}")));
        let reader = StreamReader::new(byte_stream);
        let mut lines = Box::pin(FramedRead::new(
            reader,
            RecordCodec::new(MAX_RECORD_LEN),
        ));

        let out = async_stream::stream! {
            let mut emitted = 0usize;
            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        let err = LlmError::from(e);
                        let provider = transformer.provider_id();
                        tracing::error!(provider, error = %err, "{provider} streaming error");
                        yield Err(err);
                        return;
                    }
                };

                let record = String::from_utf8_lossy(&line);
                match transformer.convert_record(&record) {
                    RecordAction::Skip => continue,
                    RecordAction::Emit(event) => {
                        emitted += 1;
                        yield Ok(event);
                    }
                    RecordAction::Done => {
                        tracing::debug!(events = emitted, "Stream terminated by sentinel");
                        return;
                    }
                }
            }
            tracing::debug!(events = emitted, "Stream body ended");
        };

        Box::pin(out)
    }
}
