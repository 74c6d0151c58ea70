//! Connection Handler Module
//!
//! This module handles individual client connections to respd.
//! Each client gets its own handler task that runs in a loop,
//! decoding requests and sending replies.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop (Reading)     │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Decode one request      │ │
//!    │  └───────────┬─────────────┘ │
//!    │              │               │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Dispatch                │ │
//!    │  └───────────┬─────────────┘ │
//!    │              │               │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Send reply (or skip)    │ │
//!    │  └───────────┬─────────────┘ │
//!    │              │               │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. Client disconnects / decode error
//!        │
//!        ▼
//! 5. Connection closed, handler task ends
//! ```
//!
//! Only a failure to decode (or to write) ends the loop. A request that is
//! not a usable command is skipped, and an unknown command gets an error
//! reply; neither closes the connection.
//!
//! ## Buffering
//!
//! The read half sits behind a `BufReader`. The decoder pulls exactly the
//! bytes of one request from it; anything the client already sent after that
//! stays buffered for the next iteration. No reply is written before its
//! request has been fully decoded.

use crate::commands::dispatch;
use crate::protocol::{DecodeError, Reply, RespDecoder};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{
    AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands answered
    pub commands_processed: AtomicU64,
    /// Requests skipped without a reply
    pub commands_skipped: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_skipped(&self) {
        self.commands_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// Generic over the stream so the same loop serves TCP sockets and
/// in-memory streams.
pub struct ConnectionHandler<S> {
    /// Buffered read half of the stream
    reader: BufReader<ReadHalf<S>>,

    /// Buffered write half of the stream
    writer: BufWriter<WriteHalf<S>>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// RESP decoder
    decoder: RespDecoder,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The stream for this connection
    /// * `addr` - The client's socket address
    /// * `decoder` - The decoder, carrying the configured limits
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: S,
        addr: SocketAddr,
        decoder: RespDecoder,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            addr,
            decoder,
            stats,
        }
    }

    /// Runs the main connection loop.
    ///
    /// Returns `Ok(())` when the client disconnects between requests, and an
    /// error when decoding or writing fails. Either way the connection is
    /// closed on return.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Accepted connection");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => debug!(client = %self.addr, "Client disconnected"),
            Err(ConnectionError::IoError(io_err))
                if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        if let Err(e) = self.writer.shutdown().await {
            trace!(client = %self.addr, error = %e, "Shutdown failed");
        }

        self.stats.connection_closed();
        info!(client = %self.addr, "Connection closed");
        result
    }

    /// The decode-dispatch-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            let request = match self.decoder.decode(&mut self.reader).await {
                Ok(request) => request,
                Err(DecodeError::ClientDisconnected) => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            debug!(client = %self.addr, request = %request, "Received command");

            match dispatch(request) {
                Ok(reply) => {
                    self.stats.command_processed();
                    self.send_reply(&reply).await?;
                }
                Err(e) => {
                    self.stats.command_skipped();
                    debug!(client = %self.addr, reason = %e, "Skipping request");
                }
            }
        }
    }

    /// Sends a reply to the client.
    async fn send_reply(&mut self, reply: &Reply) -> Result<(), ConnectionError> {
        let bytes = reply.serialize();
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent reply"
        );
        Ok(())
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The request could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion.
///
/// # Arguments
///
/// * `stream` - The TCP stream for this connection
/// * `addr` - The client's socket address
/// * `decoder` - The decoder, carrying the configured limits
/// * `stats` - Shared connection statistics
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    decoder: RespDecoder,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, decoder, stats);
    // Failures are already logged by `run`
    let _ = handler.run().await;
}
