//! stdio transport for MCP server.
//!
//! This module implements the stdio transport as specified by MCP:
//!
//! - Messages are JSON-RPC envelopes, one per line
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from client
//! - stdout: sends messages to client
//! - stderr: may be used for logging (not MCP messages)
//!
//! Frames are read as raw bytes. Invalid UTF-8 is a parse error for the
//! dispatcher to answer, not an I/O failure.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::mcp::protocol::{encode, JsonRpcResponse};

/// A line-delimited MCP transport.
///
/// Defaults to stdin/stdout; [`StdioTransport::with_io`] accepts any
/// buffered reader and writer.
pub struct StdioTransport<R = BufReader<Stdin>, W = Stdout> {
    reader: R,
    writer: W,
}

impl StdioTransport {
    /// Creates a transport over the process's stdin and stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over an arbitrary reader and writer.
    pub const fn with_io(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next frame, without its line terminator.
    ///
    /// Returns `None` once the input is closed (EOF). A final line without a
    /// trailing newline is still returned as a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut frame = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut frame).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if frame.last() == Some(&b'\n') {
            frame.pop();
            if frame.last() == Some(&b'\r') {
                frame.pop();
            }
        }

        Ok(Some(frame))
    }

    /// Writes a JSON-RPC response followed by a newline, then flushes.
    ///
    /// A response that cannot be serialised is logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        match encode(response) {
            Ok(bytes) => self.write_raw(&bytes).await,
            Err(e) => {
                tracing::error!(id = ?response.id, error = %e, "Dropping unserialisable response");
                Ok(())
            }
        }
    }

    async fn write_raw(&mut self, json: &[u8]) -> io::Result<()> {
        debug_assert!(
            !json.contains(&b'\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Returns the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Resolves when the process receives SIGINT or SIGTERM (Ctrl+C elsewhere).
///
/// If a signal handler cannot be installed the future never resolves and
/// the server runs until end of input.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(error = %e, "Failed to install signal handlers");
                    std::future::pending::<()>().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigint.recv() => tracing::info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    }
}
