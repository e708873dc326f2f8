//! Fixed-width wire forms.
//!
//! ```text
//! private: scalar (32, big-endian) ∥ chain code (32)              = 64 bytes
//! public:  compressed point (33)   ∥ chain code (32)              = 65 bytes
//! ```

use zeroize::Zeroizing;

use crate::crypto::curve::{
    CHAIN_CODE_LEN, COMPRESSED_POINT_LEN, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN, SCALAR_LEN,
};
use crate::error::{Error, KeyField, Result};
use crate::keys::{PrivateDerivationKey, PublicDerivationKey};

fn check_length(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(Error::key_creation(
            KeyField::Length,
            format!("expected {expected} bytes, got {}", bytes.len()),
        ));
    }
    Ok(())
}

impl PrivateDerivationKey {
    /// Encode as `scalar ∥ chain code`.
    pub fn to_bytes(&self) -> Result<Zeroizing<[u8; PRIVATE_KEY_LEN]>> {
        let scalar = self.scalar()?;
        let chain_code = self.chain_code()?;

        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
        out[..SCALAR_LEN].copy_from_slice(&scalar[..]);
        out[SCALAR_LEN..].copy_from_slice(&chain_code);
        Ok(out)
    }

    /// Decode the 64-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, PRIVATE_KEY_LEN)?;
        Self::new(&bytes[..SCALAR_LEN], &bytes[SCALAR_LEN..])
    }
}

impl PublicDerivationKey {
    /// Encode as `compressed point ∥ chain code`.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let mut out = [0u8; PUBLIC_KEY_LEN];
        out[..COMPRESSED_POINT_LEN].copy_from_slice(&self.to_compressed());
        out[COMPRESSED_POINT_LEN..].copy_from_slice(self.chain_code());
        out
    }

    /// Decode the 65-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, PUBLIC_KEY_LEN)?;
        debug_assert_eq!(bytes.len() - COMPRESSED_POINT_LEN, CHAIN_CODE_LEN);
        Self::from_compressed(&bytes[..COMPRESSED_POINT_LEN], &bytes[COMPRESSED_POINT_LEN..])
    }
}
