//! Streaming RESP Decoder
//!
//! This module decodes one RESP value at a time straight from a buffered
//! async reader, such as the read half of a TCP socket.
//!
//! ## How the Decoder Works
//!
//! Decoding is recursive descent on the one-byte type tag:
//!
//! 1. Read the tag byte.
//! 2. Read the header line (`*<count>` or `$<length>`), or the whole line for
//!    simple strings, errors and integers.
//! 3. For arrays, decode `count` children one after another. For bulk
//!    strings, read exactly `length` payload bytes and the 2-byte terminator.
//!
//! Every read is sized by the protocol itself, so the decoder consumes exactly
//! the bytes of one value and leaves the reader at the first byte of the next
//! one. A request that arrives in several TCP segments is simply awaited.
//!
//! ## Failure Modes
//!
//! - The peer closes before a new request starts: [`DecodeError::ClientDisconnected`]
//! - The peer closes in the middle of a value: [`DecodeError::TruncatedInput`]
//! - Unknown tag or bad header: [`DecodeError::MalformedProtocol`]
//! - Non-UTF-8 text: [`DecodeError::InvalidEncoding`]
//! - Hostile sizes or nesting: [`DecodeError::LimitExceeded`]

use crate::protocol::types::{prefix, RespValue};
use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Errors that can occur while decoding a RESP value from a stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended before the first byte of a new value
    #[error("client disconnected")]
    ClientDisconnected,

    /// The stream ended in the middle of a value
    #[error("truncated input: stream closed mid-value")]
    TruncatedInput,

    /// Unknown type tag or unparsable header
    #[error("protocol error: {0}")]
    MalformedProtocol(String),

    /// Text that is not valid UTF-8
    #[error("invalid UTF-8 in {0}")]
    InvalidEncoding(&'static str),

    /// A size or nesting limit was exceeded
    #[error("{what} too large: {size} (max: {max})")]
    LimitExceeded {
        what: &'static str,
        size: u64,
        max: u64,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Returns true if the peer closed the stream between requests.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, DecodeError::ClientDisconnected)
    }
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum number of elements in one array
pub const MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Maximum length of a header or simple line, terminator excluded
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Upper bound on speculative preallocation for arrays and payloads.
const PREALLOC_CAP: usize = 4096;

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLimits {
    /// Deepest allowed array nesting; the top-level value is depth 0
    pub max_depth: usize,
    /// Largest accepted array element count
    pub max_array_len: usize,
    /// Largest accepted bulk string payload, in bytes
    pub max_bulk_len: usize,
    /// Longest accepted line, in bytes
    pub max_line_len: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            max_array_len: MAX_ARRAY_LEN,
            max_bulk_len: MAX_BULK_SIZE,
            max_line_len: MAX_LINE_LEN,
        }
    }
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A streaming RESP decoder.
///
/// # Example
///
/// ```ignore
/// use respd::protocol::RespDecoder;
/// use tokio::io::BufReader;
///
/// let decoder = RespDecoder::new();
/// let mut reader = BufReader::new(socket);
///
/// loop {
///     let value = decoder.decode(&mut reader).await?;
///     println!("Decoded: {}", value);
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RespDecoder {
    limits: DecoderLimits,
}

impl RespDecoder {
    /// Creates a decoder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with custom limits.
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self { limits }
    }

    /// Returns the limits this decoder enforces.
    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// Decodes exactly one RESP value from `reader`.
    pub async fn decode<R>(&self, reader: &mut R) -> DecodeResult<RespValue>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        self.decode_value(reader, 0).await
    }

    /// Recursive step. Boxed so arrays can decode their children.
    fn decode_value<'a, R>(
        &'a self,
        reader: &'a mut R,
        depth: usize,
    ) -> BoxFuture<'a, DecodeResult<RespValue>>
    where
        R: AsyncBufRead + Unpin + Send + 'a,
    {
        Box::pin(async move {
            if depth > self.limits.max_depth {
                return Err(DecodeError::LimitExceeded {
                    what: "nesting depth",
                    size: depth as u64,
                    max: self.limits.max_depth as u64,
                });
            }

            let tag = match reader.read_u8().await {
                Ok(tag) => tag,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    // Only a clean gap between requests counts as a disconnect
                    return Err(if depth == 0 {
                        DecodeError::ClientDisconnected
                    } else {
                        DecodeError::TruncatedInput
                    });
                }
                Err(e) => return Err(e.into()),
            };

            match tag {
                prefix::ARRAY => self.decode_array(reader, depth).await,
                prefix::BULK_STRING => self.decode_bulk_string(reader).await,
                prefix::SIMPLE_STRING | prefix::ERROR | prefix::INTEGER => {
                    self.decode_simple(reader).await
                }
                _ => Err(DecodeError::MalformedProtocol(
                    "Invalid RESP format".to_string(),
                )),
            }
        })
    }

    /// Decodes an array body: `<count>\r\n<elements...>`
    async fn decode_array<R>(&self, reader: &mut R, depth: usize) -> DecodeResult<RespValue>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let count = self.read_integer(reader, "array length").await?;

        // Negative counts (including the null array) decode as empty
        let count = u64::try_from(count).unwrap_or(0);
        if count > self.limits.max_array_len as u64 {
            return Err(DecodeError::LimitExceeded {
                what: "array length",
                size: count,
                max: self.limits.max_array_len as u64,
            });
        }

        let count = count as usize;
        let mut elements = Vec::with_capacity(count.min(PREALLOC_CAP));
        for _ in 0..count {
            elements.push(self.decode_value(reader, depth + 1).await?);
        }

        Ok(RespValue::Array(elements))
    }

    /// Decodes a bulk string body: `<length>\r\n<data>\r\n`
    async fn decode_bulk_string<R>(&self, reader: &mut R) -> DecodeResult<RespValue>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let length = self.read_integer(reader, "bulk string length").await?;

        if length == -1 {
            return Ok(RespValue::BulkString(None));
        }

        let length = u64::try_from(length).map_err(|_| {
            DecodeError::MalformedProtocol(format!("invalid bulk string length: {}", length))
        })?;

        if length > self.limits.max_bulk_len as u64 {
            return Err(DecodeError::LimitExceeded {
                what: "bulk string",
                size: length,
                max: self.limits.max_bulk_len as u64,
            });
        }

        // Grow the payload as bytes arrive instead of trusting the header
        let mut payload = Vec::with_capacity((length as usize).min(PREALLOC_CAP));
        let read = (&mut *reader)
            .take(length)
            .read_to_end(&mut payload)
            .await?;
        if (read as u64) < length {
            return Err(DecodeError::TruncatedInput);
        }

        // The terminator is consumed but its content is not checked
        let mut terminator = [0u8; 2];
        reader
            .read_exact(&mut terminator)
            .await
            .map_err(eof_as_truncated)?;

        String::from_utf8(payload)
            .map(|s| RespValue::BulkString(Some(s)))
            .map_err(|_| DecodeError::InvalidEncoding("bulk string"))
    }

    /// Decodes a simple string, error or integer line.
    async fn decode_simple<R>(&self, reader: &mut R) -> DecodeResult<RespValue>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let line = self.read_line(reader).await?;
        String::from_utf8(line)
            .map(RespValue::Simple)
            .map_err(|_| DecodeError::InvalidEncoding("simple string"))
    }

    /// Reads a header line and parses it as a signed integer.
    async fn read_integer<R>(&self, reader: &mut R, what: &'static str) -> DecodeResult<i64>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let line = self.read_line(reader).await?;
        let text = std::str::from_utf8(&line)
            .map_err(|_| DecodeError::MalformedProtocol(format!("invalid {}", what)))?;

        text.trim()
            .parse()
            .map_err(|_| DecodeError::MalformedProtocol(format!("invalid {}: {:?}", what, text)))
    }

    /// Reads bytes up to and including `\n` and strips the trailing CR/LF.
    async fn read_line<R>(&self, reader: &mut R) -> DecodeResult<Vec<u8>>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        // Room for the line itself plus its CRLF
        let budget = self.limits.max_line_len as u64 + 2;

        let mut line = Vec::new();
        let read = (&mut *reader)
            .take(budget)
            .read_until(b'\n', &mut line)
            .await?;

        if line.last() != Some(&b'\n') {
            if read as u64 == budget {
                return Err(DecodeError::LimitExceeded {
                    what: "line",
                    size: read as u64,
                    max: self.limits.max_line_len as u64,
                });
            }
            return Err(DecodeError::TruncatedInput);
        }

        while matches!(line.last(), Some(b'\r' | b'\n')) {
            line.pop();
        }

        Ok(line)
    }
}

fn eof_as_truncated(e: std::io::Error) -> DecodeError {
    if e.kind() == ErrorKind::UnexpectedEof {
        DecodeError::TruncatedInput
    } else {
        DecodeError::Io(e)
    }
}

/// Helper function to decode a single RESP value with default limits.
///
/// This is a convenience function for simple use cases.
pub async fn decode_message<R>(reader: &mut R) -> DecodeResult<RespValue>
where
    R: AsyncBufRead + Unpin + Send,
{
    RespDecoder::new().decode(reader).await
}
