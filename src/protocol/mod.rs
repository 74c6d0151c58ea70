//! RESP Protocol Implementation
//!
//! This module provides the subset of the Redis Serialization Protocol (RESP)
//! that respd speaks.
//!
//! ## Overview
//!
//! RESP is a simple protocol used by Redis for client-server communication.
//! Every value starts with a one-byte type tag, and variable-sized values carry
//! their length up front, so a reader always knows how many bytes to wait for.
//!
//! ## Modules
//!
//! - `types`: Defines `RespValue`, `Reply` and their serialization
//! - `decoder`: Streaming decoder reading one value at a time from a socket
//!
//! ## Example
//!
//! ```ignore
//! use respd::protocol::{decode_message, Reply};
//!
//! // Decoding a request
//! let mut data: &[u8] = b"*2\r\n$4\r\nECHO\r\n$5\r\nhello\r\n";
//! let value = decode_message(&mut data).await?;
//!
//! // Creating responses
//! let bytes = Reply::simple("hello").serialize();
//! ```

pub mod decoder;
pub mod types;

// Re-export commonly used types for convenience
pub use decoder::{decode_message, DecodeError, DecodeResult, DecoderLimits, RespDecoder};
pub use types::{Reply, RespValue};
