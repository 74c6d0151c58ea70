//! RESP (Redis Serialization Protocol) Data Types
//!
//! This module defines the values that travel over the wire.
//!
//! ## Protocol Format
//!
//! Each RESP value starts with a type prefix byte:
//! - `+` Simple String
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//! - `*` Array
//!
//! All lines are terminated with CRLF (`\r\n`).
//!
//! Requests are decoded into a [`RespValue`]. Simple strings, errors and
//! integers share one representation there: the server never needs to tell
//! them apart. Responses are built as a [`Reply`], which only knows the two
//! frames the server ever sends back.
//!
//! ## Examples
//!
//! Request: `*2\r\n$4\r\nECHO\r\n$5\r\nhello\r\n`
//! Reply: `+hello\r\n`
//! Error reply: `-ERROR unknown command\r\n`
//! Null Bulk String: `$-1\r\n`

use bytes::{BufMut, BytesMut};
use std::fmt;

/// The CRLF terminator used in RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// A decoded RESP value.
///
/// A value tree is owned by the call that decoded it and is dropped once the
/// request has been dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Arrays can contain any RESP type, including nested arrays.
    /// Format: `*<count>\r\n<element1><element2>...`
    Array(Vec<RespValue>),

    /// Length-prefixed text.
    /// Format: `$<length>\r\n<data>\r\n`
    /// `None` is the null bulk string: `$-1\r\n`
    BulkString(Option<String>),

    /// One line of text: a simple string, an error or an integer.
    Simple(String),
}

impl RespValue {
    /// Creates a bulk string value.
    ///
    /// # Example
    /// ```
    /// use respd::protocol::types::RespValue;
    /// let bulk = RespValue::bulk_string("hello");
    /// assert_eq!(bulk.as_str(), Some("hello"));
    /// ```
    pub fn bulk_string(s: impl Into<String>) -> Self {
        RespValue::BulkString(Some(s.into()))
    }

    /// Creates the null bulk string.
    pub fn null() -> Self {
        RespValue::BulkString(None)
    }

    /// Creates a simple value.
    pub fn simple(s: impl Into<String>) -> Self {
        RespValue::Simple(s.into())
    }

    /// Creates an array value.
    pub fn array(values: Vec<RespValue>) -> Self {
        RespValue::Array(values)
    }

    /// Returns true if this value is the null bulk string.
    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::BulkString(None))
    }

    /// Returns the text of a bulk string or simple value.
    ///
    /// Null bulk strings and arrays have no text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RespValue::BulkString(Some(s)) | RespValue::Simple(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract the inner array.
    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Consumes self and returns the inner array if this is an Array variant.
    pub fn into_array(self) -> Option<Vec<RespValue>> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Encodes the value in wire format.
    ///
    /// Simple values are written back with the `+` prefix since the original
    /// type tag is not kept.
    pub fn serialize(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Encodes the value into an existing buffer.
    pub fn serialize_into(&self, buf: &mut BytesMut) {
        match self {
            RespValue::Array(values) => {
                buf.put_u8(prefix::ARRAY);
                buf.extend_from_slice(values.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                for value in values {
                    value.serialize_into(buf);
                }
            }
            RespValue::BulkString(Some(s)) => {
                buf.put_u8(prefix::BULK_STRING);
                buf.extend_from_slice(s.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            RespValue::BulkString(None) => {
                buf.put_u8(prefix::BULK_STRING);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
            RespValue::Simple(s) => {
                buf.put_u8(prefix::SIMPLE_STRING);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
        }
    }
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::Simple(s) | RespValue::BulkString(Some(s)) => write!(f, "\"{}\"", s),
            RespValue::BulkString(None) => write!(f, "(nil)"),
            RespValue::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A response sent back to the client.
///
/// The server only ever answers with single-line frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Format: `+<string>\r\n`
    Simple(String),

    /// Format: `-<error message>\r\n`
    Error(String),
}

impl Reply {
    /// Creates a simple string reply.
    ///
    /// # Example
    /// ```
    /// use respd::protocol::types::Reply;
    /// assert_eq!(&Reply::simple("OK").serialize()[..], b"+OK\r\n");
    /// ```
    pub fn simple(s: impl Into<String>) -> Self {
        Reply::Simple(s.into())
    }

    /// Creates an error reply.
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Common response for PONG
    pub fn pong() -> Self {
        Reply::Simple("PONG".to_string())
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Serializes the reply to bytes for sending over the wire.
    pub fn serialize(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut BytesMut) {
        let (tag, text) = match self {
            Reply::Simple(s) => (prefix::SIMPLE_STRING, s),
            Reply::Error(s) => (prefix::ERROR, s),
        };
        buf.reserve(1 + text.len() + CRLF.len());
        buf.put_u8(tag);
        buf.extend_from_slice(text.as_bytes());
        buf.extend_from_slice(CRLF);
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Simple(s) => write!(f, "\"{}\"", s),
            Reply::Error(s) => write!(f, "(error) {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_reply_serialize() {
        let reply = Reply::simple("hello");
        assert_eq!(&reply.serialize()[..], b"+hello\r\n");
    }

    #[test]
    fn test_error_reply_serialize() {
        let reply = Reply::error("ERROR unknown command");
        assert_eq!(&reply.serialize()[..], b"-ERROR unknown command\r\n");
        assert!(reply.is_error());
    }

    #[test]
    fn test_pong_reply() {
        assert_eq!(&Reply::pong().serialize()[..], b"+PONG\r\n");
    }

    #[test]
    fn test_request_serialize() {
        let value = RespValue::array(vec![
            RespValue::bulk_string("ECHO"),
            RespValue::bulk_string("hello"),
        ]);
        assert_eq!(
            &value.serialize()[..],
            b"*2\r\n$4\r\nECHO\r\n$5\r\nhello\r\n"
        );
    }

    #[test]
    fn test_null_serialize() {
        assert_eq!(&RespValue::null().serialize()[..], b"$-1\r\n");
    }

    #[test]
    fn test_as_str() {
        assert_eq!(RespValue::bulk_string("a").as_str(), Some("a"));
        assert_eq!(RespValue::simple("OK").as_str(), Some("OK"));
        assert_eq!(RespValue::null().as_str(), None);
        assert_eq!(RespValue::array(vec![]).as_str(), None);
    }

    #[test]
    fn test_display() {
        let value = RespValue::array(vec![RespValue::bulk_string("PING"), RespValue::null()]);
        assert_eq!(value.to_string(), "[\"PING\", (nil)]");
    }
}
