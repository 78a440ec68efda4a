//! Capability-restricted handles over the session's RSA private key.
//!
//! The same PKCS#8 key is imported twice: once as an RSA-OAEP/SHA-256
//! decryption key and once as an RSA-PSS/SHA-256 signing key. The two handles
//! are distinct types, so a decrypt handle cannot be passed where a signature
//! is produced:
//!
//! ```compile_fail
//! fn misuse(keys: &fmd_crypto::SessionKeypair) {
//!     let _ = fmd_crypto::sign_command(keys.decrypt_key(), "ring", 0);
//! }
//! ```
//!
//! ```compile_fail
//! fn misuse(keys: &fmd_crypto::SessionKeypair, packet: &str) {
//!     let _ = fmd_crypto::decrypt_packet(keys.sign_key(), packet);
//! }
//! ```

use crate::error::{CryptoError, CryptoResult};
use crate::signer::PSS_SALT_SIZE;
use rand::rngs::OsRng;
use rsa::oaep::DecryptingKey;
use rsa::pss::{BlindedSigningKey, VerifyingKey};
use rsa::signature::{Keypair, RandomizedSigner, SignatureEncoding};
use rsa::traits::RandomizedDecryptor;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

/// Decrypt-only handle (RSA-OAEP, SHA-256).
pub struct DecryptKey {
    inner: DecryptingKey<Sha256>,
}

impl DecryptKey {
    fn new(key: RsaPrivateKey) -> Self {
        Self {
            inner: DecryptingKey::new(key),
        }
    }

    /// Recovers a session key from its RSA-OAEP ciphertext. Blinded.
    pub(crate) fn unwrap_session_key(&self, wrapped: &[u8]) -> rsa::Result<Zeroizing<Vec<u8>>> {
        self.inner
            .decrypt_with_rng(&mut OsRng, wrapped)
            .map(Zeroizing::new)
    }
}

impl fmt::Debug for DecryptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecryptKey(RSA-OAEP/SHA-256, [REDACTED])")
    }
}

/// Sign-only handle (RSA-PSS, SHA-256, 32-byte salt).
pub struct SignKey {
    inner: BlindedSigningKey<Sha256>,
    public: RsaPublicKey,
}

impl SignKey {
    fn new(key: RsaPrivateKey) -> Self {
        Self {
            public: key.to_public_key(),
            inner: BlindedSigningKey::new_with_salt_len(key, PSS_SALT_SIZE),
        }
    }

    /// Public half, for verifying signatures made with this handle.
    pub fn verifying_key(&self) -> VerifyingKey<Sha256> {
        self.inner.verifying_key()
    }

    /// Public RSA key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub(crate) fn sign(&self, message: &[u8]) -> CryptoResult<Box<[u8]>> {
        self.inner
            .try_sign_with_rng(&mut OsRng, message)
            .map(|signature| signature.to_bytes())
            .map_err(|e| CryptoError::SignatureFailed(e.to_string()))
    }
}

impl fmt::Debug for SignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignKey(RSA-PSS/SHA-256, [REDACTED])")
    }
}

/// The two handles produced by one unwrap. Immutable; safe to share for
/// concurrent decrypt and sign calls.
pub struct SessionKeypair {
    decrypt: DecryptKey,
    sign: SignKey,
}

impl SessionKeypair {
    pub(crate) fn from_private_key(key: RsaPrivateKey) -> Self {
        Self {
            sign: SignKey::new(key.clone()),
            decrypt: DecryptKey::new(key),
        }
    }

    pub fn decrypt_key(&self) -> &DecryptKey {
        &self.decrypt
    }

    pub fn sign_key(&self) -> &SignKey {
        &self.sign
    }
}

impl fmt::Debug for SessionKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeypair")
            .field("decrypt", &self.decrypt)
            .field("sign", &self.sign)
            .finish()
    }
}
