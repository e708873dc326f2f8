//! Secure Byte Primitives
//!
//! Helpers used wherever secret material is compared, hashed or released:
//!
//! - **constant_time_eq**: equality whose running time does not depend on
//!   where two buffers first differ
//! - **wipe**: zeroing that the optimiser may not elide (`zeroize`)
//! - **hmac_sha512**: the HMAC step shared by both derivation engines

use core::hint::black_box;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::curve::{CHAIN_CODE_LEN, SCALAR_LEN};

// ============================================================================
// Comparison and Clearing
// ============================================================================

/// Compare two byte sequences in time independent of their contents.
///
/// A length mismatch returns `false` immediately; lengths are not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    black_box(diff) == 0
}

/// Overwrite every byte of `buffer` with zero.
pub fn wipe(buffer: &mut [u8]) {
    buffer.zeroize();
}

// ============================================================================
// HMAC-SHA512
// ============================================================================

/// HMAC-SHA512 over the concatenation of `parts`.
///
/// The output is wiped when dropped since for hardened steps its left half is
/// as sensitive as the parent scalar.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        hmac.update(part);
    }

    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&hmac.finalize().into_bytes());
    out
}

/// Split an HMAC output into (IL, IR).
pub(crate) fn split_hmac_output(
    output: &[u8; 64],
) -> (Zeroizing<[u8; SCALAR_LEN]>, [u8; CHAIN_CODE_LEN]) {
    let mut left = Zeroizing::new([0u8; SCALAR_LEN]);
    let mut right = [0u8; CHAIN_CODE_LEN];
    left.copy_from_slice(&output[..SCALAR_LEN]);
    right.copy_from_slice(&output[SCALAR_LEN..]);
    (left, right)
}
