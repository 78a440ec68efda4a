//! Command signing.
//!
//! The signed message is `"{unix_time_millis}:{command}"`. The server rebuilds
//! the same string to verify, and rejects stale timestamps.

use crate::envelope::{decode_base64, encode_base64};
use crate::error::{CryptoError, CryptoResult};
use crate::keypair::SignKey;
use rsa::pss::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;

/// RSA-PSS salt length in bytes.
pub const PSS_SALT_SIZE: usize = 32;

/// Builds the exact string that is signed for a command.
#[must_use]
pub fn signing_message(command: &str, unix_time_millis: u64) -> String {
    format!("{unix_time_millis}:{command}")
}

/// Signs `command` at `unix_time_millis` and returns the base64 signature.
///
/// The caller supplies the timestamp; this function reads no clock.
pub fn sign_command(key: &SignKey, command: &str, unix_time_millis: u64) -> CryptoResult<String> {
    let message = signing_message(command, unix_time_millis);
    let signature = key.sign(message.as_bytes())?;
    Ok(encode_base64(&signature))
}

/// Checks a base64 command signature against a verifying key.
pub fn verify_command(
    key: &VerifyingKey<Sha256>,
    command: &str,
    unix_time_millis: u64,
    signature_base64: &str,
) -> CryptoResult<()> {
    let bytes = decode_base64(signature_base64)
        .map_err(|e| CryptoError::SignatureFailed(format!("signature is not base64: {e}")))?;
    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| CryptoError::SignatureFailed(e.to_string()))?;

    let message = signing_message(command, unix_time_millis);
    key.verify(message.as_bytes(), &signature)
        .map_err(|_| CryptoError::SignatureFailed("signature does not match".into()))
}
