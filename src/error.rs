//! Error types for apiros
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for apiros operations
#[derive(Debug, Error)]
pub enum ApiError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Address resolution failed for {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection closed by remote end")]
    ConnectionClosed,

    #[error("Session is not connected")]
    NotConnected,

    #[error("Session is already connected")]
    AlreadyConnected,

    #[error("Session has been closed")]
    SessionClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Command trapped: {message}")]
    Trap {
        category: Option<String>,
        message: String,
    },

    #[error("Fatal reply: {0}")]
    Fatal(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Normalise a stream error, mapping short reads and zero-byte writes
    /// to [`ApiError::ConnectionClosed`].
    pub fn from_stream(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => ApiError::ConnectionClosed,
            _ => ApiError::Io(err),
        }
    }

    /// True when the error means the peer went away.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ApiError::ConnectionClosed => true,
            ApiError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
