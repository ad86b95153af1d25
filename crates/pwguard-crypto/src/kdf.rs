// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2 key derivation from a user pin.
//!
//! PBKDF2-HMAC-SHA1 with an empty salt. Weak by modern standards, but every
//! envelope already in a vault was sealed with exactly this derivation.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroizing;

/// Length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Iteration count used by existing deployments.
pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(4096) {
    Some(n) => n,
    None => unreachable!(),
};

/// Derive a 32-byte key from a pin. Surrounding whitespace is ignored.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(pin: &str, iterations: NonZeroU32) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA1,
        iterations,
        b"",
        pin.trim().as_bytes(),
        &mut key[..],
    );
    key
}
