// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crypto envelope for stored credentials.
//!
//! A short user pin is stretched into an AES-256 key ([`derive_key`]); a
//! credential is sealed into a self-describing base64 envelope
//! ([`encrypt`]) that carries its own nonce. The key is never stored, so a
//! lost pin means the entry cannot be recovered.

pub mod credential;
pub mod envelope;
pub mod kdf;

pub use credential::{CredentialPair, sanitize_reveal, unseal};
pub use envelope::{NONCE_LEN, decrypt, encrypt};
pub use kdf::{DEFAULT_ITERATIONS, KEY_LEN, derive_key};
