//! IPC client for talking to the timer daemon.
//!
//! One request per connection. Only connecting is retried, with a linear
//! back-off: once a request has been written the daemon may already have
//! applied it, so a lost or late reply is reported instead of resent. An
//! `error` response from the daemon is final.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::daemon::ipc::default_socket_path;
use crate::types::{Configuration, IpcRequest, IpcResponse};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum attempts per request
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
    /// Read/write timeout once connected
    io_timeout: Duration,
}

impl IpcClient {
    /// Creates a client for the default socket path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_socket_path(default_socket_path()?))
    }

    /// Creates a client for a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            io_timeout: Duration::from_secs(IO_TIMEOUT_SECS),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn start(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Start).await
    }

    pub async fn pause(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Pause).await
    }

    pub async fn skip(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Skip).await
    }

    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Reset).await
    }

    pub async fn reset_all(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::ResetAll).await
    }

    pub async fn status(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Status).await
    }

    /// Asks the daemon to replace its configuration.
    pub async fn reload(&self, config: Configuration) -> Result<IpcResponse> {
        self.send(&IpcRequest::Reload { config }).await
    }

    /// Sends a request and fails on an `error` response.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable after all retries, if
    /// the reply is lost or late, or with the daemon's message if it
    /// rejected the request.
    pub async fn send(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut stream = self.connect_with_retry().await?;
        let response = self.exchange(&mut stream, request).await?;
        if response.is_error() {
            anyhow::bail!("{}", response.message);
        }
        Ok(response)
    }

    async fn connect_with_retry(&self) -> Result<UnixStream> {
        let mut attempt = 1;
        loop {
            match self.connect().await {
                Ok(stream) => return Ok(stream),
                Err(e) if attempt >= MAX_RETRIES => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Connection failed (attempt {}/{}): {:#}",
                        attempt,
                        MAX_RETRIES,
                        e
                    );
                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn connect(&self) -> Result<UnixStream> {
        timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .with_context(|| {
                format!(
                    "Cannot connect to the daemon at {}. Is 'pomotimer daemon' running?",
                    self.socket_path.display()
                )
            })
    }

    async fn exchange(
        &self,
        stream: &mut UnixStream,
        request: &IpcRequest,
    ) -> Result<IpcResponse> {
        let io_timeout = self.io_timeout;
        let request_json =
            serde_json::to_vec(request).context("Failed to serialize request")?;

        timeout(io_timeout, stream.write_all(&request_json))
            .await
            .context("Write timed out")?
            .context("Failed to send request")?;

        // Closing the write half marks the end of the request
        stream.shutdown().await.context("Failed to finish request")?;

        let mut buffer = Vec::new();
        let mut limited = (&mut *stream).take(MAX_RESPONSE_SIZE as u64);
        timeout(io_timeout, limited.read_to_end(&mut buffer))
            .await
            .context("Read timed out")?
            .context("Failed to receive response")?;

        if buffer.is_empty() {
            anyhow::bail!("The daemon closed the connection without a response");
        }

        serde_json::from_slice(&buffer).context("Failed to parse response")
    }
}

// ============================================================================
// Tests
// ============================================================================
