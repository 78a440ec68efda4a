//! Cryptographic core of the FMD client.
//!
//! Provides:
//! - Argon2id password derivation with per-purpose context strings
//! - Parsing of the wrapped-key and hybrid-packet envelopes
//! - Recovery of the user's RSA-3072 key from its password-protected blob
//! - RSA-OAEP + AES-GCM hybrid packet decryption
//! - RSA-PSS command signing bound to a timestamp
//!
//! # Flow
//!
//! 1. The caller fetches the wrapped key blob and calls
//!    [`unwrap_private_key`] once per login. This yields a
//!    [`SessionKeypair`] with a decrypt-only and a sign-only handle.
//! 2. Server responses go through [`decrypt_packet`] with the decrypt handle.
//! 3. Outbound commands go through [`sign_command`] with the sign handle.
//!
//! Nothing here performs I/O or retries. Argon2id runs with 128 MiB of
//! memory and blocks the calling thread.

pub mod envelope;
mod error;
mod hybrid;
pub mod kdf;
mod keypair;
mod keywrap;
mod signer;

pub use envelope::{
    HYBRID_PACKET_PREFIX_SIZE, HybridPacket, IV_SIZE, RSA_MODULUS_SIZE, WRAPPED_KEY_PREFIX_SIZE,
    WrappedKeyBlob, decode_base64, encode_base64,
};
pub use error::{CryptoError, CryptoResult, UnwrapStage};
pub use hybrid::{decrypt_packet, decrypt_packet_to_string, open_packet};
pub use kdf::{
    Context, DerivedKey, DerivedSecret, KEY_SIZE, OutputMode, SALT_SIZE, Salt, derive, derive_encoded,
    derive_key, hash_password_for_login,
};
pub use keypair::{DecryptKey, SessionKeypair, SignKey};
pub use keywrap::{unwrap_blob, unwrap_private_key};
pub use signer::{PSS_SALT_SIZE, sign_command, signing_message, verify_command};

/// Re-exported so callers can name the verifying key type.
pub use rsa::pss::VerifyingKey;
pub use rsa::RsaPublicKey;
