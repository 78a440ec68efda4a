//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to an FMD server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("crypto error: {0}")]
    Crypto(#[from] fmd_crypto::CryptoError),

    /// Raised by [`ServerApi`](crate::ServerApi) implementations.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    #[error("the server holds no locations for this device")]
    NoLocations,

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A blocking crypto task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl ClientError {
    /// True when the private key could not be unwrapped with the given
    /// password.
    #[must_use]
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, Self::Crypto(e) if e.is_wrong_password())
    }
}
