//! # respd - A Minimal RESP Server
//!
//! respd speaks a small subset of the Redis Serialization Protocol (RESP).
//! It accepts TCP connections, decodes requests as they stream in, and
//! answers `PING` and `ECHO`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            respd                             │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐       │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │       │
//! │  │ (Listener)  │    │  Handler    │    │ Dispatcher  │       │
//! │  └─────────────┘    └──────┬──────┘    └─────────────┘       │
//! │                            │                                 │
//! │                            ▼                                 │
//! │                     ┌─────────────┐                          │
//! │                     │   RESP      │                          │
//! │                     │  Decoder    │                          │
//! │                     └─────────────┘                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use respd::connection::{handle_connection, ConnectionStats};
//! use respd::protocol::RespDecoder;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let stats = Arc::new(ConnectionStats::new());
//!     let listener = TcpListener::bind("localhost:6379").await.unwrap();
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await.unwrap();
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, RespDecoder::new(), stats));
//!     }
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `PING` → `+PONG\r\n`
//! - `ECHO message` → `+message\r\n`
//! - anything else → `-ERROR unknown command\r\n`
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP value types and the streaming decoder
//! - [`commands`]: Turns a decoded request into a reply
//! - [`connection`]: Per-client read-dispatch-reply loop
//! - [`config`]: Command-line configuration
//!
//! ## Design Highlights
//!
//! ### Exact-Length Decoding
//!
//! The decoder reads straight from the socket's buffered reader and never
//! consumes a byte past the end of the current request, so back-to-back
//! requests are answered one at a time, in order.
//!
//! ### Two Kinds of Failure
//!
//! A request that cannot be decoded closes the connection. A request that
//! decodes but is not a usable command is skipped, and an unknown command
//! gets an error reply; the connection stays open in both cases.

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;

// Re-export commonly used types for convenience
pub use commands::{dispatch, Command, CommandError};
pub use config::Config;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{DecodeError, DecoderLimits, Reply, RespDecoder, RespValue};

/// The default port respd listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host respd binds to
pub const DEFAULT_HOST: &str = "localhost";

/// Version of respd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
