//! Record framing
//!
//! Splits a byte stream on `\n` without interpreting the bytes, so a record
//! that is not valid UTF-8 cannot poison the records after it. Records longer
//! than the configured limit are discarded up to their terminating newline.

use std::{cmp, io};

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Newline-delimited record decoder yielding raw line bytes.
///
/// The trailing `\n` is removed; a `\r` before it is left for the record
/// transformer to handle.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    max_length: usize,
    // Index into the buffer already searched for a newline.
    next_index: usize,
    is_discarding: bool,
}

impl RecordCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            is_discarding: false,
        }
    }
}

impl Decoder for RecordCodec {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<BytesMut>, io::Error> {
        loop {
            let read_to = cmp::min(self.max_length.saturating_add(1), buf.len());
            let newline = buf[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n');

            match (self.is_discarding, newline) {
                (true, Some(offset)) => {
                    buf.advance(self.next_index + offset + 1);
                    self.is_discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset;
                    self.next_index = 0;
                    let mut line = buf.split_to(end + 1);
                    line.truncate(end);
                    return Ok(Some(line));
                }
                (false, None) if buf.len() > self.max_length => {
                    tracing::warn!(
                        max_length = self.max_length,
                        "Stream record exceeds maximum length; discarding it"
                    );
                    self.is_discarding = true;
                    self.next_index = 0;
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<BytesMut>, io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if buf.is_empty() || self.is_discarding {
            buf.clear();
            self.is_discarding = false;
            return Ok(None);
        }
        Ok(Some(buf.split_to(buf.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut RecordCodec, input: &[u8]) -> Vec<Vec<u8>> {
        let mut buf = BytesMut::from(input);
        let mut out = Vec::new();
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            out.push(line.to_vec());
        }
        while let Some(line) = codec.decode_eof(&mut buf).unwrap() {
            out.push(line.to_vec());
        }
        out
    }

    #[test]
    fn splits_on_newline_and_keeps_trailing_record() {
        let mut codec = RecordCodec::new(64);
        let out = decode_all(&mut codec, b"one\n\ntwo\r\nthree");
        assert_eq!(
            out,
            vec![
                b"one".to_vec(),
                b"".to_vec(),
                b"two\r".to_vec(),
                b"three".to_vec()
            ]
        );
    }

    #[test]
    fn passes_invalid_utf8_through() {
        let mut codec = RecordCodec::new(64);
        let out = decode_all(&mut codec, b"a\n\xFF\xFE\nb\n");
        assert_eq!(out, vec![b"a".to_vec(), vec![0xFF, 0xFE], b"b".to_vec()]);
    }

    #[test]
    fn discards_overlong_record_and_resumes() {
        let mut codec = RecordCodec::new(4);
        let out = decode_all(&mut codec, b"ok\n0123456789\nnext\n");
        assert_eq!(out, vec![b"ok".to_vec(), b"next".to_vec()]);
    }

    #[test]
    fn discards_overlong_record_across_chunks() {
        let mut codec = RecordCodec::new(4);
        let mut buf = BytesMut::from(&b"0123456"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"789\nabc\n");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), &b"abc"[..]);
    }

    #[test]
    fn overlong_trailing_record_at_eof_is_dropped() {
        let mut codec = RecordCodec::new(4);
        let out = decode_all(&mut codec, b"ok\n0123456789");
        assert_eq!(out, vec![b"ok".to_vec()]);
    }
}
