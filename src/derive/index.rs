//! BIP-32 Child Key Derivation
//!
//! One derivation step from a parent key and a child number.
//!
//! ```text
//! hardened: IL ∥ IR = HMAC-SHA512(chain_code, 0x00 ∥ parent_sk ∥ BE32(i + 2^31))
//! normal:   IL ∥ IR = HMAC-SHA512(chain_code, compressed(P) ∥ BE32(i))
//! child_sk  = (IL + parent_sk) mod N
//! child_pk  = IL·G + P                    (normal steps only)
//! child_cc  = IR
//! ```
//!
//! An `IL` at or above the curve order makes the index invalid, as BIP-32
//! prescribes; callers skip to the next index.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use secp256kfun::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crypto::curve::{CHAIN_CODE_LEN, HARDENED_INDEX_BOUNDARY};
use crate::crypto::secure::{hmac_sha512, split_hmac_output};
use crate::error::{Error, KeyField, Result};
use crate::keys::{PrivateDerivationKey, PublicDerivationKey};

// ============================================================================
// Child Numbers
// ============================================================================

/// A single derivation step: an index in `0..2^31` plus a hardening flag.
///
/// Values built directly from the variants are range-checked when they are
/// used for derivation; deserialization checks them up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ChildNumberRepr")]
pub enum ChildNumber {
    /// Derivable from the public key.
    Normal(u32),
    /// Requires the private scalar.
    Hardened(u32),
}

/// Wire shape of [`ChildNumber`], before the range check.
#[derive(Deserialize)]
enum ChildNumberRepr {
    Normal(u32),
    Hardened(u32),
}

impl TryFrom<ChildNumberRepr> for ChildNumber {
    type Error = Error;

    fn try_from(repr: ChildNumberRepr) -> Result<Self> {
        match repr {
            ChildNumberRepr::Normal(index) => ChildNumber::normal(index),
            ChildNumberRepr::Hardened(index) => ChildNumber::hardened(index),
        }
    }
}

impl ChildNumber {
    /// Unhardened child `index`; fails unless `index < 2^31`.
    pub fn normal(index: u32) -> Result<Self> {
        if index >= HARDENED_INDEX_BOUNDARY {
            return Err(Error::out_of_range("index", index));
        }
        Ok(ChildNumber::Normal(index))
    }

    /// Hardened child `index'`; fails unless `index < 2^31`.
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= HARDENED_INDEX_BOUNDARY {
            return Err(Error::out_of_range("index", index));
        }
        Ok(ChildNumber::Hardened(index))
    }

    /// Signed-index form: negative indices are rejected, never reinterpreted.
    pub fn from_signed(index: i32, hardened: bool) -> Result<Self> {
        let index = u32::try_from(index).map_err(|_| Error::out_of_range("index", index))?;
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }

    /// Decode the on-wire value (`index + 2^31` for hardened steps).
    pub fn from_derivation_value(value: u32) -> Self {
        if value >= HARDENED_INDEX_BOUNDARY {
            ChildNumber::Hardened(value - HARDENED_INDEX_BOUNDARY)
        } else {
            ChildNumber::Normal(value)
        }
    }

    /// The index without the hardening offset.
    pub fn index(&self) -> u32 {
        match self {
            ChildNumber::Normal(index) | ChildNumber::Hardened(index) => *index,
        }
    }

    /// Whether the step needs the parent's private scalar.
    #[inline]
    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildNumber::Hardened(_))
    }

    /// Fails with [`Error::OutOfRange`] unless the index is below `2^31`.
    fn ensure_in_range(self) -> Result<Self> {
        let index = self.index();
        if index >= HARDENED_INDEX_BOUNDARY {
            return Err(Error::out_of_range("index", index));
        }
        Ok(self)
    }

    /// The value fed to HMAC (`index + 2^31` for hardened steps).
    pub fn to_derivation_value(&self) -> u32 {
        match self {
            ChildNumber::Normal(index) => *index,
            ChildNumber::Hardened(index) => index | HARDENED_INDEX_BOUNDARY,
        }
    }
}

impl Display for ChildNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChildNumber::Normal(index) => write!(f, "{index}"),
            ChildNumber::Hardened(index) => write!(f, "{index}'"),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidArgument(format!(
                "`{s}` is not a derivation index"
            )));
        }
        let index: u32 = digits.parse().map_err(|_| {
            Error::InvalidArgument(format!("derivation index `{s}` does not fit in 32 bits"))
        })?;

        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

// ============================================================================
// Single-Step Derivation
// ============================================================================

/// Split the HMAC output into a validated tweak and the child chain code.
fn child_tweak(
    chain_code: &[u8; CHAIN_CODE_LEN],
    parts: &[&[u8]],
    child: ChildNumber,
) -> Result<(Scalar<Public, Zero>, [u8; CHAIN_CODE_LEN])> {
    let output = hmac_sha512(chain_code, parts);
    let (left, child_chain_code) = split_hmac_output(&output);

    let tweak = Scalar::<Public, Zero>::from_bytes(*left).ok_or_else(|| {
        warn!(%child, "derived tweak exceeds curve order, index is unusable");
        Error::key_creation(KeyField::Scalar, format!("tweak for {child} exceeds curve order"))
    })?;

    Ok((tweak, child_chain_code))
}

/// Derive one private step.
pub fn derive_private_child_number(
    parent: &PrivateDerivationKey,
    child: ChildNumber,
) -> Result<PrivateDerivationKey> {
    let child = child.ensure_in_range()?;
    let parent_scalar = parent.secret_scalar()?;
    let chain_code = parent.chain_code()?;
    let value = child.to_derivation_value().to_be_bytes();
    debug!(%child, "deriving private child");

    let (tweak, child_chain_code) = if child.is_hardened() {
        let scalar = parent.scalar()?;
        child_tweak(&chain_code, &[&[0u8], &scalar[..], &value], child)?
    } else {
        let point = parent.public_key()?.to_compressed();
        child_tweak(&chain_code, &[&point, &value], child)?
    };

    let child_scalar = s!(parent_scalar + tweak)
        .non_zero()
        .ok_or_else(|| Error::key_creation(KeyField::Scalar, "derived scalar is zero"))?;

    Ok(PrivateDerivationKey::from_secret_scalar(
        child_scalar,
        child_chain_code,
    ))
}

/// Derive one private step from a signed index and a hardening flag.
///
/// Negative indices fail with [`Error::OutOfRange`].
pub fn derive_private_child(
    parent: &PrivateDerivationKey,
    index: i32,
    hardened: bool,
) -> Result<PrivateDerivationKey> {
    let child = ChildNumber::from_signed(index, hardened)?;
    derive_private_child_number(parent, child)
}

/// Derive one public step; hardened steps are impossible without the scalar.
pub fn derive_public_child(
    parent: &PublicDerivationKey,
    child: ChildNumber,
) -> Result<PublicDerivationKey> {
    if let ChildNumber::Hardened(index) = child.ensure_in_range()? {
        return Err(Error::HardenedFromPublic { index });
    }
    let value = child.to_derivation_value().to_be_bytes();
    debug!(%child, "deriving public child");

    let (tweak, child_chain_code) =
        child_tweak(parent.chain_code(), &[&parent.to_compressed(), &value], child)?;

    let child_point = g!({ *parent.point() } + tweak * G)
        .normalize()
        .non_zero()
        .ok_or_else(|| Error::key_creation(KeyField::Point, "derived point is at infinity"))?;

    Ok(PublicDerivationKey::new(child_point, child_chain_code))
}
