//! Shared fixtures and server-side helpers for integration tests.
//!
//! The server half of the protocol (wrapping a key, sealing a packet) lives
//! here because the crate itself never produces those envelopes.

#![allow(dead_code)]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use fmd_crypto::{
    Context, HybridPacket, IV_SIZE, Salt, SessionKeypair, WrappedKeyBlob, derive_key,
    unwrap_private_key,
};
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::sync::OnceLock;

pub const PASSWORD: &str = "hunter2";

/// RSA-3072 PKCS#8 key the fixtures were produced with.
pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa3072_pkcs8.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/rsa3072_public.pem");

/// `PRIVATE_KEY_PEM` wrapped under `PASSWORD` with salt 0x01..=0x10 and
/// iv 0xa0..=0xab.
pub const WRAPPED_KEY: &str = include_str!("../fixtures/wrapped_key_hunter2.b64");

/// Location record sealed to `PUBLIC_KEY_PEM` with a 32-byte session key.
pub const LOCATION_PACKET: &str = include_str!("../fixtures/location_packet.b64");
pub const LOCATION_PLAINTEXT: &str = include_str!("../fixtures/location_plaintext.json");

/// Base64 of a PNG signature + IHDR header, sealed like a picture upload.
pub const PICTURE_PACKET: &str = include_str!("../fixtures/picture_packet.b64");
pub const PICTURE_BYTES: [u8; 16] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
];

/// Keypair unwrapped from the fixture blob, shared across a test binary.
pub fn session_keypair() -> &'static SessionKeypair {
    static KEYPAIR: OnceLock<SessionKeypair> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        unwrap_private_key(PASSWORD, WRAPPED_KEY).expect("fixture blob must unwrap")
    })
}

pub fn private_key() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY_PEM).expect("fixture key must parse")
}

pub fn public_key() -> RsaPublicKey {
    RsaPublicKey::from_public_key_pem(PUBLIC_KEY_PEM).expect("fixture public key must parse")
}

pub fn random_salt() -> Salt {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    Salt::from_bytes(bytes)
}

pub fn random_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Wraps arbitrary plaintext the way the server wraps the PEM key.
pub fn wrap_bytes(password: &str, plaintext: &[u8], salt: Salt, iv: [u8; IV_SIZE]) -> String {
    let key = derive_key(Context::AsymmetricKeyWrap, password, &salt).expect("derivation");
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).expect("32-byte key");
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .expect("encryption must succeed");
    WrappedKeyBlob::new(salt, iv, ciphertext).to_base64()
}

/// Wraps the fixture PEM under `password` with a fresh salt and iv.
pub fn wrap_fixture_key(password: &str) -> String {
    wrap_bytes(password, PRIVATE_KEY_PEM.as_bytes(), random_salt(), random_iv())
}

/// Seals `plaintext` for `recipient` with an AES session key of `key_len` bytes.
pub fn seal_with_key_len(recipient: &RsaPublicKey, plaintext: &[u8], key_len: usize) -> HybridPacket {
    let mut session_key = vec![0u8; key_len];
    OsRng.fill_bytes(&mut session_key);
    let iv = random_iv();

    let ciphertext = match key_len {
        16 => aes_gcm::Aes128Gcm::new_from_slice(&session_key)
            .expect("16-byte key")
            .encrypt(Nonce::from_slice(&iv), plaintext),
        32 => Aes256Gcm::new_from_slice(&session_key)
            .expect("32-byte key")
            .encrypt(Nonce::from_slice(&iv), plaintext),
        24 => aes_gcm::AesGcm::<aes_gcm::aes::Aes192, aes_gcm::aead::consts::U12>::new_from_slice(
            &session_key,
        )
        .expect("24-byte key")
        .encrypt(Nonce::from_slice(&iv), plaintext),
        // Unusable AES length: encrypt with a 32-byte key, wrap a truncated one.
        _ => Aes256Gcm::new_from_slice(&[0u8; 32])
            .expect("32-byte key")
            .encrypt(Nonce::from_slice(&iv), plaintext),
    }
    .expect("encryption must succeed");

    let wrapped = recipient
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &session_key)
        .expect("RSA-OAEP encryption must succeed");

    HybridPacket::new(wrapped, iv, ciphertext).expect("wrapped key is one modulus long")
}

/// Seals `plaintext` the way the server does (32-byte AES session key).
pub fn seal(recipient: &RsaPublicKey, plaintext: &[u8]) -> String {
    seal_with_key_len(recipient, plaintext, 32).to_base64()
}
