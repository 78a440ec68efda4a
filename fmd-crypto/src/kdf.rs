//! Password-based key derivation.
//!
//! Every derivation runs Argon2id over `context ++ password`, so one password
//! yields unrelated secrets for login and for key wrapping. The cost
//! parameters are wire constants shared with the server.

use crate::envelope::decode_base64;
use crate::error::{CryptoError, CryptoResult};
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Argon2id time cost (iterations).
pub const ARGON2_TIME_COST: u32 = 1;

/// Argon2id lanes.
pub const ARGON2_PARALLELISM: u32 = 4;

/// Argon2id memory cost in KiB (128 MiB).
pub const ARGON2_MEMORY_KIB: u32 = 131_072;

/// Size of derived keys and hashes in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Purpose a derivation is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Credential verifier sent to the server at login.
    LoginAuthentication,
    /// AES key protecting the wrapped private key.
    AsymmetricKeyWrap,
    /// Device PIN hashing.
    FmdPin,
}

impl Context {
    /// The literal prefix hashed in front of the password.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginAuthentication => "context:loginAuthentication",
            Self::AsymmetricKeyWrap => "context:asymmetricKeyWrap",
            Self::FmdPin => "context:fmdPin",
        }
    }
}

/// A 16-byte Argon2 salt. Not secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub const fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a salt from a slice, rejecting anything but 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; SALT_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::DerivationFailed(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Decodes a base64 salt as delivered by the server.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = decode_base64(encoded)
            .map_err(|e| CryptoError::DerivationFailed(format!("salt is not base64: {e}")))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Raw 32-byte secret produced by a derivation. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Output form of a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Raw bytes, used as a symmetric key.
    Raw,
    /// PHC-encoded hash string, used as a login credential.
    Encoded,
}

/// Result of [`derive`].
#[derive(Debug)]
pub enum DerivedSecret {
    Raw(DerivedKey),
    Encoded(String),
}

/// Derives a secret from `context ++ password` and `salt`.
///
/// Both output modes run with identical cost parameters.
pub fn derive(
    context: Context,
    password: &str,
    salt: &Salt,
    mode: OutputMode,
) -> CryptoResult<DerivedSecret> {
    match mode {
        OutputMode::Raw => derive_key(context, password, salt).map(DerivedSecret::Raw),
        OutputMode::Encoded => derive_encoded(context, password, salt).map(DerivedSecret::Encoded),
    }
}

/// Derives a raw 32-byte key.
pub fn derive_key(context: Context, password: &str, salt: &Salt) -> CryptoResult<DerivedKey> {
    let input = context_input(context, password);
    let mut key = [0u8; KEY_SIZE];
    hasher()?
        .hash_password_into(&input, salt.as_bytes(), &mut key)
        .map_err(|e| CryptoError::DerivationFailed(e.to_string()))?;

    let derived = DerivedKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}

/// Derives a PHC string (`$argon2id$v=19$m=131072,t=1,p=4$<salt>$<hash>`).
pub fn derive_encoded(context: Context, password: &str, salt: &Salt) -> CryptoResult<String> {
    let input = context_input(context, password);
    let salt_string = SaltString::encode_b64(salt.as_bytes())
        .map_err(|e| CryptoError::DerivationFailed(format!("invalid salt: {e}")))?;

    let hash = hasher()?
        .hash_password(&input, &salt_string)
        .map_err(|e| CryptoError::DerivationFailed(e.to_string()))?;
    Ok(hash.to_string())
}

/// Computes the credential sent to the server at login from the
/// server-issued base64 salt.
pub fn hash_password_for_login(password: &str, salt_base64: &str) -> CryptoResult<String> {
    let salt = Salt::from_base64(salt_base64)?;
    derive_encoded(Context::LoginAuthentication, password, &salt)
}

fn hasher() -> CryptoResult<Argon2<'static>> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        Some(KEY_SIZE),
    )
    .map_err(|e| CryptoError::DerivationFailed(format!("invalid Argon2 parameters: {e}")))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn context_input(context: Context, password: &str) -> Zeroizing<Vec<u8>> {
    let prefix = context.as_str().as_bytes();
    let mut input = Zeroizing::new(Vec::with_capacity(prefix.len() + password.len()));
    input.extend_from_slice(prefix);
    input.extend_from_slice(password.as_bytes());
    input
}
