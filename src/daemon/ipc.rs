//! IPC server for the timer daemon.
//!
//! One JSON request per Unix socket connection, answered by one JSON response.
//! Requests are translated into [`Command`]s and go through the same queue as
//! every other producer, so the socket never touches the engine directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::types::{IpcRequest, IpcResponse, ResponseData};

use super::runner::{Command, CommandSender};

// ============================================================================
// Constants
// ============================================================================

/// Socket location relative to the home directory
pub const DEFAULT_SOCKET_PATH: &str = ".pomotimer/pomotimer.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Returns `~/.pomotimer/pomotimer.sock`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(DEFAULT_SOCKET_PATH))
}

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Client closed the connection without sending anything
    #[error("Connection closed by client")]
    EmptyRequest,

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Binds a server to `socket_path`, replacing any stale socket file.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Accepts connections forever, serving each on its own task.
    pub async fn run(self, handler: RequestHandler) {
        loop {
            match self.accept().await {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, &handler).await {
                            debug!("IPC connection ended: {:#}", e);
                        }
                    });
                }
                Err(e) => warn!("{:#}", e),
            }
        }
    }

    /// Reads and deserializes one request. The client signals the end of the
    /// request by shutting down its write half.
    ///
    /// # Errors
    ///
    /// Returns an [`IpcError`] on timeout, oversize, empty or malformed input.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest, IpcError> {
        let mut buffer = Vec::with_capacity(512);
        let mut limited = (&mut *stream).take(MAX_REQUEST_SIZE as u64 + 1);

        match timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            limited.read_to_end(&mut buffer),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string())),
            Err(_) => return Err(IpcError::Timeout),
        }

        if buffer.is_empty() {
            return Err(IpcError::EmptyRequest);
        }
        if buffer.len() > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge);
        }

        serde_json::from_slice(&buffer).map_err(|e| IpcError::InvalidRequest(e.to_string()))
    }

    /// Serializes and sends a response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Serves a single connection: one request, one response.
///
/// Unreadable requests are answered with an error response before the
/// connection closes.
///
/// # Errors
///
/// Returns an error if the response cannot be written.
pub async fn serve_connection(mut stream: UnixStream, handler: &RequestHandler) -> Result<()> {
    let response = match IpcServer::receive_request(&mut stream).await {
        Ok(request) => handler.handle(request).await,
        Err(IpcError::EmptyRequest) => return Ok(()),
        Err(e) => {
            warn!("Rejected IPC request: {}", e);
            IpcResponse::error(e.to_string())
        }
    };

    IpcServer::send_response(&mut stream, &response).await
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Translates IPC requests into queued commands.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    commands: CommandSender,
}

impl RequestHandler {
    pub fn new(commands: CommandSender) -> Self {
        Self { commands }
    }

    /// Maps a wire request onto a command.
    pub fn command_for(request: IpcRequest) -> Command {
        match request {
            IpcRequest::Start => Command::Start,
            IpcRequest::Pause => Command::Pause,
            IpcRequest::Skip => Command::Skip,
            IpcRequest::Reset => Command::ResetCurrent,
            IpcRequest::ResetAll => Command::ResetAll,
            IpcRequest::Status => Command::Snapshot,
            IpcRequest::Reload { config } => Command::Reload(config),
        }
    }

    fn success_message(request: &IpcRequest) -> &'static str {
        match request {
            IpcRequest::Start => "Timer started",
            IpcRequest::Pause => "Timer paused",
            IpcRequest::Skip => "Phase skipped",
            IpcRequest::Reset => "Phase reset",
            IpcRequest::ResetAll => "Session reset",
            IpcRequest::Status => "",
            IpcRequest::Reload { .. } => "Configuration reloaded",
        }
    }

    /// Handles a request and returns the response to send.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        debug!(command = request.name(), "IPC request");
        let message = Self::success_message(&request);

        match self.commands.request(Self::command_for(request)).await {
            Ok(Ok(outcome)) => IpcResponse::success(
                message,
                Some(ResponseData {
                    state: outcome.state,
                    config: outcome.config,
                }),
            ),
            Ok(Err(rejected)) => IpcResponse::error(rejected.to_string()),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
