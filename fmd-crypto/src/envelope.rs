//! Fixed binary layouts of the two server-delivered envelopes.
//!
//! ```text
//! WrappedKeyBlob : salt (16) || iv (12) || ciphertext (..)
//! HybridPacket   : rsa-wrapped session key (384) || iv (12) || ciphertext (..)
//! ```
//!
//! Both arrive as base64 text. Parsing is pure slicing; nothing here touches
//! key material.

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{SALT_SIZE, Salt};
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use zeroize::Zeroizing;

/// AES-GCM nonce size in bytes.
pub const IV_SIZE: usize = 12;

/// RSA modulus size of the protocol key (3072 bits).
///
/// The hybrid packet layout depends on it; client and server change it
/// together or not at all.
pub const RSA_MODULUS_SIZE: usize = 3072 / 8;

/// Minimum length of a decoded wrapped key blob.
pub const WRAPPED_KEY_PREFIX_SIZE: usize = SALT_SIZE + IV_SIZE;

/// Minimum length of a decoded hybrid packet.
pub const HYBRID_PACKET_PREFIX_SIZE: usize = RSA_MODULUS_SIZE + IV_SIZE;

/// Standard alphabet, padding optional, trailing bits tolerated.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes base64 the way browsers' `atob` does: whitespace is ignored and
/// padding is optional.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Zeroizing<Vec<u8>> = Zeroizing::new(
        input
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect(),
    );
    FORGIVING.decode(compact.as_slice())
}

/// Standard padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Password-protected private key as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKeyBlob {
    salt: Salt,
    iv: [u8; IV_SIZE],
    ciphertext: Vec<u8>,
}

impl WrappedKeyBlob {
    pub fn new(salt: Salt, iv: [u8; IV_SIZE], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            iv,
            ciphertext,
        }
    }

    /// Parses the server's base64 text.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = decode_base64(encoded).map_err(|e| {
            CryptoError::MalformedEnvelope(format!("wrapped key blob is not base64: {e}"))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Splits raw bytes into salt, iv and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let too_short = || {
            CryptoError::MalformedEnvelope(format!(
                "wrapped key blob is {} bytes, need at least {WRAPPED_KEY_PREFIX_SIZE}",
                bytes.len()
            ))
        };
        let (salt, rest) = bytes.split_first_chunk::<SALT_SIZE>().ok_or_else(too_short)?;
        let (iv, ciphertext) = rest.split_first_chunk::<IV_SIZE>().ok_or_else(too_short)?;

        Ok(Self {
            salt: Salt::from_bytes(*salt),
            iv: *iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WRAPPED_KEY_PREFIX_SIZE + self.ciphertext.len());
        out.extend_from_slice(self.salt.as_bytes());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    /// AES-GCM ciphertext including the trailing 16-byte tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// Hybrid-encrypted server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridPacket {
    wrapped_session_key: Vec<u8>,
    iv: [u8; IV_SIZE],
    ciphertext: Vec<u8>,
}

impl HybridPacket {
    /// Assembles a packet. The wrapped session key must be exactly one RSA
    /// modulus long.
    pub fn new(
        wrapped_session_key: Vec<u8>,
        iv: [u8; IV_SIZE],
        ciphertext: Vec<u8>,
    ) -> CryptoResult<Self> {
        if wrapped_session_key.len() != RSA_MODULUS_SIZE {
            return Err(CryptoError::MalformedEnvelope(format!(
                "wrapped session key is {} bytes, expected {RSA_MODULUS_SIZE}",
                wrapped_session_key.len()
            )));
        }
        Ok(Self {
            wrapped_session_key,
            iv,
            ciphertext,
        })
    }

    /// Parses the server's base64 text.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = decode_base64(encoded).map_err(|e| {
            CryptoError::MalformedEnvelope(format!("hybrid packet is not base64: {e}"))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Splits raw bytes into wrapped session key, iv and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let too_short = || {
            CryptoError::MalformedEnvelope(format!(
                "hybrid packet is {} bytes, need at least {HYBRID_PACKET_PREFIX_SIZE}",
                bytes.len()
            ))
        };
        let (wrapped, rest) = bytes
            .split_first_chunk::<RSA_MODULUS_SIZE>()
            .ok_or_else(too_short)?;
        let (iv, ciphertext) = rest.split_first_chunk::<IV_SIZE>().ok_or_else(too_short)?;

        Ok(Self {
            wrapped_session_key: wrapped.to_vec(),
            iv: *iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HYBRID_PACKET_PREFIX_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.wrapped_session_key);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    /// RSA-OAEP ciphertext of the AES session key.
    pub fn wrapped_session_key(&self) -> &[u8] {
        &self.wrapped_session_key
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forgiving_decode_ignores_whitespace_and_padding() {
        assert_eq!(decode_base64("aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_base64(" aGVs bG8= \r\n").unwrap(), b"hello");
    }

    #[test]
    fn forgiving_decode_rejects_garbage() {
        assert!(decode_base64("not*base64").is_err());
    }

    #[test]
    fn prefix_sizes() {
        assert_eq!(WRAPPED_KEY_PREFIX_SIZE, 28);
        assert_eq!(HYBRID_PACKET_PREFIX_SIZE, 396);
    }
}
