//! Hybrid packet decryption (RSA-OAEP wrapped AES-GCM session key).
//!
//! All failures after parsing collapse into [`CryptoError::DecryptFailed`];
//! the failing step is only logged at debug level.

use crate::envelope::{HybridPacket, IV_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::keypair::DecryptKey;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{self, Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use tracing::debug;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Decrypts a base64 hybrid packet into raw plaintext bytes.
///
/// Packets shorter than the 396-byte prefix are rejected with
/// [`CryptoError::MalformedEnvelope`] before any cryptography runs.
pub fn decrypt_packet(key: &DecryptKey, packet_base64: &str) -> CryptoResult<Vec<u8>> {
    let packet = HybridPacket::from_base64(packet_base64)?;
    open_packet(key, &packet)
}

/// Decrypts a base64 hybrid packet whose plaintext is UTF-8 text.
///
/// Invalid UTF-8 is rejected as [`CryptoError::DecryptFailed`], never
/// replaced with U+FFFD.
pub fn decrypt_packet_to_string(key: &DecryptKey, packet_base64: &str) -> CryptoResult<String> {
    let plaintext = decrypt_packet(key, packet_base64)?;
    String::from_utf8(plaintext).map_err(|_| opaque("plaintext is not UTF-8"))
}

/// Decrypts an already-parsed packet.
pub fn open_packet(key: &DecryptKey, packet: &HybridPacket) -> CryptoResult<Vec<u8>> {
    let session_key = key
        .unwrap_session_key(packet.wrapped_session_key())
        .map_err(|_| opaque("session key unwrap"))?;

    let plaintext = match session_key.len() {
        16 => open_with::<Aes128Gcm>(&session_key, packet.iv(), packet.ciphertext()),
        24 => open_with::<Aes192Gcm>(&session_key, packet.iv(), packet.ciphertext()),
        32 => open_with::<Aes256Gcm>(&session_key, packet.iv(), packet.ciphertext()),
        _ => return Err(opaque("session key has an invalid AES length")),
    };

    plaintext.ok_or_else(|| opaque("payload authentication"))
}

fn open_with<C: KeyInit + Aead>(key: &[u8], iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Option<Vec<u8>> {
    let cipher = C::new_from_slice(key).ok()?;
    cipher
        .decrypt(aead::Nonce::<C>::from_slice(iv), ciphertext)
        .ok()
}

fn opaque(step: &str) -> CryptoError {
    debug!("hybrid packet decryption failed: {step}");
    CryptoError::DecryptFailed
}
