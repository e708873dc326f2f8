use core::ops::{Deref, DerefMut};

use tracing::debug;

use crate::crypto::curve::{CHAIN_CODE_LEN, SCALAR_LEN};
use crate::crypto::mnemonic::{mnemonic_to_seed, parse_mnemonic, seed_to_master_parts};
use crate::error::Result;
use crate::keys::PrivateDerivationKey;

/// The root of a key hierarchy.
///
/// A `MasterKey` is a [`PrivateDerivationKey`] tagged as a root; it adds no
/// data or behaviour and dereferences to the inner key.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MasterKey(PrivateDerivationKey);

impl MasterKey {
    /// Mark an existing key as a hierarchy root.
    pub fn from_key(key: PrivateDerivationKey) -> Self {
        Self(key)
    }

    /// Build a master key from raw scalar and chain code bytes handed over by
    /// a seed provider. The provider's scalar buffer is zeroed.
    pub fn from_parts(
        scalar: &mut [u8; SCALAR_LEN],
        chain_code: [u8; CHAIN_CODE_LEN],
    ) -> Result<Self> {
        PrivateDerivationKey::from_parts(scalar, chain_code).map(Self)
    }

    /// BIP-32 master key for `seed` (16 to 64 bytes).
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let (mut scalar, chain_code) = seed_to_master_parts(seed)?;
        Self::from_parts(&mut *scalar, chain_code)
    }

    /// BIP-32 master key for a BIP-39 English mnemonic and passphrase.
    pub fn from_mnemonic(words: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = parse_mnemonic(words)?;
        debug!(words = mnemonic.word_count(), "deriving master key from mnemonic");
        let seed = mnemonic_to_seed(&mnemonic, passphrase);
        Self::from_seed(&seed[..])
    }

    /// Borrow the underlying private key.
    pub fn as_key(&self) -> &PrivateDerivationKey {
        &self.0
    }

    /// Give up the root marker.
    pub fn into_key(self) -> PrivateDerivationKey {
        self.0
    }
}

impl Deref for MasterKey {
    type Target = PrivateDerivationKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MasterKey {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl AsRef<PrivateDerivationKey> for MasterKey {
    fn as_ref(&self) -> &PrivateDerivationKey {
        &self.0
    }
}

impl From<MasterKey> for PrivateDerivationKey {
    fn from(master: MasterKey) -> Self {
        master.0
    }
}
