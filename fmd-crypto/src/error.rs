//! Error types for the cryptographic core.

use std::fmt;
use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Step of the private-key unwrap that failed.
///
/// Kept for local diagnostics. Callers presenting errors across a trust
/// boundary should collapse this into a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwrapStage {
    /// AES-GCM tag mismatch: wrong password or corrupted blob.
    Authentication,
    /// Decrypted bytes are not a UTF-8 PEM document with a valid base64 body.
    Encoding,
    /// DER bytes are not an RSA PKCS#8 key of the protocol size.
    KeyImport,
}

impl fmt::Display for UnwrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authentication => "wrong password or corrupted key blob",
            Self::Encoding => "key blob does not contain a PEM private key",
            Self::KeyImport => "key blob does not contain an RSA-3072 PKCS#8 key",
        })
    }
}

/// Errors that can occur in the cryptographic core.
///
/// Every failure is terminal for the operation that produced it; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("private key unwrap failed: {0}")]
    UnwrapFailed(UnwrapStage),

    /// Carries no detail about which step of the packet failed.
    #[error("packet decryption failed")]
    DecryptFailed,

    #[error("signing failed: {0}")]
    SignatureFailed(String),
}

impl CryptoError {
    /// Returns true when an unwrap failed authentication, which in practice
    /// means the password was wrong.
    #[must_use]
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, Self::UnwrapFailed(UnwrapStage::Authentication))
    }
}
