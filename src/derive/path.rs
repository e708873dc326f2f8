//! Multi-Level Derivation Paths
//!
//! [`DerivationPath`] is a sequence of [`ChildNumber`]s written as
//! `m/44'/0'/0'/0/5`. [`Bip44Path`] is the typed five-level form
//! `m / 44' / coin' / account' / channel / index`.
//!
//! ## Usage
//!
//! ```ignore
//! let path: DerivationPath = "m/44'/0'/0'/0/0".parse()?;
//! let leaf = derive_private_path(&master, &path)?;
//! let same = derive_private_bip44(&master, 0, 0, 0, 0)?;
//! ```

use core::fmt::{self, Display, Formatter};
use core::ops::Deref;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::crypto::curve::{BIP44_PURPOSE, HARDENED_INDEX_BOUNDARY};
use crate::derive::index::{derive_private_child_number, derive_public_child, ChildNumber};
use crate::error::{Error, Result};
use crate::keys::{MasterKey, PrivateDerivationKey, PublicDerivationKey};

// ============================================================================
// DerivationPath
// ============================================================================

/// A sequence of derivation steps applied root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(&mut self, child: ChildNumber) {
        self.0.push(child);
    }

    /// A new path with `child` appended.
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut path = self.clone();
        path.push(child);
        path
    }

    /// Whether every step can be taken from a public key.
    pub fn is_public_derivable(&self) -> bool {
        self.0.iter().all(|child| !child.is_hardened())
    }
}

impl Deref for DerivationPath {
    type Target = [ChildNumber];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(path: Vec<ChildNumber>) -> Self {
        Self(path)
    }
}

impl FromIterator<ChildNumber> for DerivationPath {
    fn from_iter<T: IntoIterator<Item = ChildNumber>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'path> IntoIterator for &'path DerivationPath {
    type Item = ChildNumber;
    type IntoIter = core::iter::Copied<core::slice::Iter<'path, ChildNumber>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s.trim().strip_prefix('m').ok_or_else(|| {
            Error::InvalidArgument(format!("derivation path `{s}` must start with `m`"))
        })?;
        if rest.is_empty() {
            return Ok(Self::master());
        }

        let rest = rest.strip_prefix('/').ok_or_else(|| {
            Error::InvalidArgument(format!("derivation path `{s}` is malformed"))
        })?;
        rest.split('/').map(ChildNumber::from_str).collect()
    }
}

impl Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Bip44Path
// ============================================================================

/// BIP-44 coordinates: `m / 44' / coin' / account' / channel / index`.
///
/// `channel` 0 and 1 are conventionally the external and change chains; the
/// engine does not enforce that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bip44Path {
    pub coin: u32,
    pub account: u32,
    pub channel: u32,
    pub index: u32,
}

impl Bip44Path {
    pub fn new(coin: u32, account: u32, channel: u32, index: u32) -> Self {
        Self {
            coin,
            account,
            channel,
            index,
        }
    }

    /// External (receiving) chain address at `index`.
    pub fn receive(coin: u32, account: u32, index: u32) -> Self {
        Self::new(coin, account, 0, index)
    }

    /// Internal (change) chain address at `index`.
    pub fn change(coin: u32, account: u32, index: u32) -> Self {
        Self::new(coin, account, 1, index)
    }

    /// The account-level prefix `m / 44' / coin' / account'`.
    pub fn account_path(&self) -> Result<DerivationPath> {
        Ok(DerivationPath::from(vec![
            ChildNumber::hardened(BIP44_PURPOSE)?,
            ChildNumber::hardened(self.coin).map_err(|_| coordinate_error("coin", self.coin))?,
            ChildNumber::hardened(self.account)
                .map_err(|_| coordinate_error("account", self.account))?,
        ]))
    }

    /// The unhardened suffix `channel / index`, relative to the account.
    pub fn relative_path(&self) -> Result<DerivationPath> {
        Ok(DerivationPath::from(vec![
            ChildNumber::normal(self.channel)
                .map_err(|_| coordinate_error("channel", self.channel))?,
            ChildNumber::normal(self.index).map_err(|_| coordinate_error("index", self.index))?,
        ]))
    }

    /// The full five-level path.
    pub fn to_derivation_path(&self) -> Result<DerivationPath> {
        let mut path = self.account_path()?;
        for child in &self.relative_path()? {
            path.push(child);
        }
        Ok(path)
    }
}

impl Display for Bip44Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{BIP44_PURPOSE}'/{}'/{}'/{}/{}",
            self.coin, self.account, self.channel, self.index
        )
    }
}

fn coordinate_error(what: &'static str, value: u32) -> Error {
    debug_assert!(value >= HARDENED_INDEX_BOUNDARY);
    Error::out_of_range(what, value)
}

// ============================================================================
// Path Derivation
// ============================================================================

/// Apply every step of `path` to `root`, root to leaf.
///
/// Intermediate keys are wiped as soon as the next step has been taken.
pub fn derive_private_path(
    root: &PrivateDerivationKey,
    path: &DerivationPath,
) -> Result<PrivateDerivationKey> {
    root.ensure_live()?;
    debug!(%path, "deriving private path");

    let mut current: Option<PrivateDerivationKey> = None;
    for child in path {
        let parent = current.as_ref().unwrap_or(root);
        current = Some(derive_private_child_number(parent, child)?);
    }

    Ok(current.unwrap_or_else(|| root.clone()))
}

/// Apply every step of `path` to a public `root`; hardened steps fail.
pub fn derive_public_path(
    root: &PublicDerivationKey,
    path: &DerivationPath,
) -> Result<PublicDerivationKey> {
    debug!(%path, "deriving public path");
    path.iter()
        .try_fold(*root, |parent, child| derive_public_child(&parent, *child))
}

/// Derive `m / 44' / coin' / account' / channel / index` from `master`.
pub fn derive_private_bip44(
    master: &MasterKey,
    coin: u32,
    account: u32,
    channel: u32,
    index: u32,
) -> Result<PrivateDerivationKey> {
    let path = Bip44Path::new(coin, account, channel, index).to_derivation_path()?;
    derive_private_path(master, &path)
}
