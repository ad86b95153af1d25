// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-CFB envelope: `base64(nonce[16] || ciphertext)`.
//!
//! Every call to [`encrypt`] draws a fresh 16-byte nonce from the system
//! CSPRNG. There is no integrity tag, so decrypting with the wrong key
//! yields garbage text instead of an error.

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use pwguard_core::PwguardError;
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::KEY_LEN;

/// Nonce (CFB initialization vector) length, one AES block.
pub const NONCE_LEN: usize = 16;

type Encryptor = cfb_mode::Encryptor<Aes256>;
type Decryptor = cfb_mode::Decryptor<Aes256>;

fn check_key(key: &[u8]) -> Result<(), PwguardError> {
    if key.len() != KEY_LEN {
        return Err(PwguardError::Key(format!(
            "expected {KEY_LEN} key bytes, got {}",
            key.len()
        )));
    }
    Ok(())
}

/// Encrypts `plaintext` under `key` and returns the base64 envelope.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<String, PwguardError> {
    check_key(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce)
        .map_err(|_| PwguardError::Internal("failed to generate random nonce".to_string()))?;

    encrypt_with_nonce(key, &nonce, plaintext)
}

fn encrypt_with_nonce(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<String, PwguardError> {
    let cipher = Encryptor::new_from_slices(key, nonce)
        .map_err(|_| PwguardError::Key("invalid AES-256-CFB key or nonce length".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + plaintext.len());
    out.extend_from_slice(nonce);
    out.extend_from_slice(plaintext);
    cipher.encrypt(&mut out[NONCE_LEN..]);

    Ok(STANDARD.encode(out))
}

/// Decrypts a base64 envelope produced by [`encrypt`].
///
/// Invalid UTF-8 in the recovered bytes is replaced with U+FFFD.
pub fn decrypt(key: &[u8], envelope: &str) -> Result<String, PwguardError> {
    check_key(key)?;

    let mut raw = STANDARD
        .decode(envelope.trim())
        .map_err(|e| PwguardError::Format(format!("envelope is not base64: {e}")))?;
    if raw.len() < NONCE_LEN {
        return Err(PwguardError::Format(format!(
            "envelope shorter than {NONCE_LEN} bytes"
        )));
    }

    let (nonce, body) = raw.split_at_mut(NONCE_LEN);
    let cipher = Decryptor::new_from_slices(key, nonce)
        .map_err(|_| PwguardError::Key("invalid AES-256-CFB key or nonce length".to_string()))?;
    cipher.decrypt(body);

    Ok(String::from_utf8_lossy(body).into_owned())
}
