// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login/password pairs and their sealed form.

use std::fmt;
use std::num::NonZeroU32;

use pwguard_core::PwguardError;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::envelope::{decrypt, encrypt};
use crate::kdf::derive_key;

/// A login and password about to be sealed.
pub struct CredentialPair {
    login: SecretString,
    password: SecretString,
}

impl CredentialPair {
    pub fn new(login: SecretString, password: SecretString) -> Self {
        Self { login, password }
    }

    /// The sealed plaintext: `"<login>:<password>"`, both trimmed.
    pub fn to_plaintext(&self) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "{}:{}",
            self.login.expose_secret().trim(),
            self.password.expose_secret().trim()
        ))
    }

    /// Splits the pair back into login and password.
    pub fn into_parts(self) -> (SecretString, SecretString) {
        (self.login, self.password)
    }

    /// Derives the key from `pin` and seals this pair into an envelope.
    pub fn seal(&self, pin: &SecretString, iterations: NonZeroU32) -> Result<String, PwguardError> {
        let key = derive_key(pin.expose_secret(), iterations);
        encrypt(key.as_ref(), self.to_plaintext().as_bytes())
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialPair([REDACTED])")
    }
}

/// Derives the key from `pin` and opens `envelope` for display.
pub fn unseal(
    pin: &str,
    iterations: NonZeroU32,
    envelope: &str,
) -> Result<SecretString, PwguardError> {
    let key = derive_key(pin, iterations);
    let text = decrypt(key.as_ref(), envelope)?;
    Ok(SecretString::from(sanitize_reveal(&text)))
}

/// Flattens decrypted text onto one line before it is shown.
pub fn sanitize_reveal(text: &str) -> String {
    text.replace('\n', " ")
}
