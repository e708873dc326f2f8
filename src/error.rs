//! Error types for key construction and derivation.
//!
//! Every fallible operation in this crate returns [`enum@Error`]. The variants
//! follow the four failure categories of the derivation core:
//!
//! - **Invalid argument**: malformed caller input (paths, mnemonics, seeds)
//! - **Out of range**: a numeric parameter outside its domain
//! - **Key creation**: a key would violate its structural invariants
//! - **Disposed**: secret material was accessed after release
//!
//! # Example
//!
//! ```
//! use hdtag::{Error, KeyField, PrivateDerivationKey};
//!
//! let err = PrivateDerivationKey::from_bytes(&[0u8; 10]).unwrap_err();
//! assert!(matches!(err, Error::KeyCreation { field: KeyField::Length, .. }));
//! ```

use core::fmt;
use core::result::Result as CoreResult;
use thiserror::Error;

/// The field of a key that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    /// Total length of a serialized buffer.
    Length,
    /// The private scalar.
    Scalar,
    /// The chain code.
    ChainCode,
    /// The public curve point.
    Point,
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyField::Length => "length",
            KeyField::Scalar => "scalar",
            KeyField::ChainCode => "chain code",
            KeyField::Point => "point",
        })
    }
}

/// The main error type for key construction and derivation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Caller input could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric parameter lies outside its domain.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// Name of the offending parameter.
        what: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// A key could not be constructed from the given material.
    #[error("key creation failed: invalid {field}: {reason}")]
    KeyCreation {
        /// Which part of the key was invalid.
        field: KeyField,
        /// Human readable reason.
        reason: String,
    },

    /// The secret material of a private key has been wiped.
    #[error("key material has already been disposed")]
    Disposed,

    /// A hardened step was requested from a public key.
    #[error("hardened index {index}' cannot be derived from a public key")]
    HardenedFromPublic {
        /// The unhardened index value of the rejected step.
        index: u32,
    },
}

impl Error {
    pub(crate) fn key_creation(field: KeyField, reason: impl Into<String>) -> Self {
        Error::KeyCreation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: impl Into<i64>) -> Self {
        Error::OutOfRange {
            what,
            value: value.into(),
        }
    }
}

impl From<bip39::Error> for Error {
    fn from(err: bip39::Error) -> Self {
        Error::InvalidArgument(format!("mnemonic rejected: {err}"))
    }
}

/// A specialized [`Result`] type for key derivation operations.
pub type Result<T> = CoreResult<T, Error>;
