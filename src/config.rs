//! Server configuration.
//!
//! Every option has a default, so running the binary with no arguments
//! serves on `localhost:6379` with the standard decoder limits.

use crate::protocol::decoder::{MAX_ARRAY_LEN, MAX_BULK_SIZE, MAX_LINE_LEN, MAX_NESTING_DEPTH};
use crate::protocol::DecoderLimits;
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

/// Command-line arguments for the server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "respd")]
#[command(version)]
#[command(about = "A minimal RESP server answering PING and ECHO", long_about = None)]
pub struct Config {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Deepest allowed array nesting in a request
    #[arg(long, default_value_t = MAX_NESTING_DEPTH)]
    pub max_depth: usize,

    /// Largest accepted array element count
    #[arg(long, default_value_t = MAX_ARRAY_LEN)]
    pub max_array_len: usize,

    /// Largest accepted bulk string, in bytes
    #[arg(long, default_value_t = MAX_BULK_SIZE)]
    pub max_bulk_len: usize,

    /// Longest accepted protocol line, in bytes
    #[arg(long, default_value_t = MAX_LINE_LEN)]
    pub max_line_len: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_depth: MAX_NESTING_DEPTH,
            max_array_len: MAX_ARRAY_LEN,
            max_bulk_len: MAX_BULK_SIZE,
            max_line_len: MAX_LINE_LEN,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the decoder limits from the configured values
    pub fn decoder_limits(&self) -> DecoderLimits {
        DecoderLimits {
            max_depth: self.max_depth,
            max_array_len: self.max_array_len,
            max_bulk_len: self.max_bulk_len,
            max_line_len: self.max_line_len,
        }
    }
}
