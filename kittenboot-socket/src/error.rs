//! Error types for socket configuration and operations.

use thiserror::Error;

/// Error reported by a transport implementation.
///
/// The façade never inspects or translates these; they are carried through
/// as-is inside [`SocketError::Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Configuration error, raised while building a [`SocketConfig`](crate::SocketConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required field was never set
    #[error("KittenBootSocket. {0} is not set")]
    MissingField(&'static str),

    /// A field holds a value that breaks the path-segment rules
    #[error("KittenBootSocket. {field} {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// The url scheme or shape is not usable
    #[error("KittenBootSocket. Url must start with \"ws://\" (or \"wss://\" for secure connection), got {0:?}")]
    InvalidUrl(String),

    /// Settings text or value could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Socket error type.
#[derive(Error, Debug)]
pub enum SocketError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Operation requires a completed handshake
    #[error("KittenBootSocket. Not connected yet, call this from on_connect or later")]
    NotConnected,

    /// Topic or destination path is not usable
    #[error("KittenBootSocket. Invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected path
        path: String,
        /// Human readable reason
        reason: &'static str,
    },

    /// The process-wide handle already holds a socket
    #[error("KittenBootSocket. Global socket already initialized")]
    AlreadyInitialized,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reported by the underlying transport
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),
}

/// Result type for socket operations.
pub type SocketResult<T> = Result<T, SocketError>;
