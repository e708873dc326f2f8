use core::fmt;
use core::hash::{Hash, Hasher};

use bitcoin::hashes::{hash160, Hash as HashesHash};
use secp256kfun::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::crypto::curve::{CHAIN_CODE_LEN, COMPRESSED_POINT_LEN, SCALAR_LEN};
use crate::crypto::secure::wipe;
use crate::error::{Error, KeyField, Result};
use crate::keys::private::scalar_from_bytes;

/// A non-secret derivation key: a curve point plus its chain code.
///
/// The point is always a valid, non-identity secp256k1 point; the type
/// parameters of [`Point`] make an invalid value unrepresentable, and every
/// byte-level constructor validates before building one.
#[derive(Clone, Copy)]
pub struct PublicDerivationKey {
    point: Point,
    chain_code: [u8; CHAIN_CODE_LEN],
}

impl PublicDerivationKey {
    /// Build a key from an already validated point.
    pub fn new(point: Point, chain_code: [u8; CHAIN_CODE_LEN]) -> Self {
        Self { point, chain_code }
    }

    /// Build a key from a SEC1 compressed point and a chain code.
    pub fn from_compressed(point: &[u8], chain_code: &[u8]) -> Result<Self> {
        let point_bytes: [u8; COMPRESSED_POINT_LEN] = point.try_into().map_err(|_| {
            Error::key_creation(
                KeyField::Point,
                format!("expected {COMPRESSED_POINT_LEN} bytes, got {}", point.len()),
            )
        })?;
        let chain_code: [u8; CHAIN_CODE_LEN] = chain_code.try_into().map_err(|_| {
            Error::key_creation(
                KeyField::ChainCode,
                format!("expected {CHAIN_CODE_LEN} bytes, got {}", chain_code.len()),
            )
        })?;

        let point = Point::from_bytes(point_bytes).ok_or_else(|| {
            Error::key_creation(KeyField::Point, "not a valid compressed secp256k1 point")
        })?;

        Ok(Self::new(point, chain_code))
    }

    /// Compute the public key for `scalar`.
    ///
    /// The caller's scalar buffer is zeroed before returning, whether or not
    /// the scalar was valid.
    pub fn from_scalar(
        scalar: &mut [u8; SCALAR_LEN],
        chain_code: [u8; CHAIN_CODE_LEN],
    ) -> Result<Self> {
        let public =
            scalar_from_bytes(scalar).map(|secret| Self::from_secret_scalar(secret, chain_code));
        wipe(scalar);
        public
    }

    pub(crate) fn from_secret_scalar(
        scalar: Scalar<Secret, NonZero>,
        chain_code: [u8; CHAIN_CODE_LEN],
    ) -> Self {
        trace!("computing public projection");
        let point = g!(scalar * G).normalize();
        Self::new(point, chain_code)
    }

    /// The curve point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// The chain code.
    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_LEN] {
        &self.chain_code
    }

    /// SEC1 compressed encoding of the point.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_POINT_LEN] {
        self.point.to_bytes()
    }

    /// BIP-32 key fingerprint: the first four bytes of HASH160(point).
    pub fn fingerprint(&self) -> [u8; 4] {
        let hash = <hash160::Hash as HashesHash>::hash(&self.to_compressed()).to_byte_array();
        [hash[0], hash[1], hash[2], hash[3]]
    }
}

impl PartialEq for PublicDerivationKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed() && self.chain_code == other.chain_code
    }
}

impl Eq for PublicDerivationKey {}

impl Hash for PublicDerivationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_compressed().hash(state);
        self.chain_code.hash(state);
    }
}

impl fmt::Debug for PublicDerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicDerivationKey")
            .field("point", &hex::encode(self.to_compressed()))
            .field("chain_code", &hex::encode(self.chain_code))
            .finish()
    }
}

// ============================================================================
// Serde: hex string of the 65-byte wire form
// ============================================================================

impl Serialize for PublicDerivationKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for PublicDerivationKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        PublicDerivationKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}
