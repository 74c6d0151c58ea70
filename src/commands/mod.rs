//! Command Module
//!
//! This module implements the command layer of respd.
//! It receives decoded RESP requests and produces the reply to send back.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  RESP Decoder   │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   dispatch()    │  (this module)
//! │                 │
//! │  - Validate     │
//! │  - Normalize    │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//!     Reply or Skip
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`, `ECHO`

pub mod handler;

// Re-export the dispatcher and its types
pub use handler::{dispatch, Command, CommandError, UNKNOWN_COMMAND};
