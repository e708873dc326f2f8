use core::cell::OnceCell;
use core::fmt;
use core::hash::{Hash, Hasher};

use secp256kfun::prelude::*;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::curve::{CHAIN_CODE_LEN, SCALAR_LEN};
use crate::crypto::secure::{constant_time_eq, wipe};
use crate::error::{Error, KeyField, Result};
use crate::keys::public::PublicDerivationKey;

/// Parse a big-endian scalar, requiring `1 <= scalar < N`.
pub(crate) fn scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Scalar<Secret, NonZero>> {
    Scalar::<Secret, Zero>::from_bytes(*bytes)
        .ok_or_else(|| Error::key_creation(KeyField::Scalar, "not below the curve order"))?
        .non_zero()
        .ok_or_else(|| Error::key_creation(KeyField::Scalar, "must not be zero"))
}

/// A secret derivation key: a scalar in `[1, N-1]` plus its chain code.
///
/// The key owns its buffers outright and wipes them when it is disposed or
/// dropped, whichever comes first. After [`dispose`](Self::dispose) every
/// accessor returns [`Error::Disposed`].
///
/// The public projection is computed on first use and cached. The cache is a
/// [`OnceCell`], so a key may be moved between threads but not shared by
/// reference across them without outside locking.
#[derive(Clone)]
pub struct PrivateDerivationKey {
    scalar: [u8; SCALAR_LEN],
    chain_code: [u8; CHAIN_CODE_LEN],
    public: OnceCell<PublicDerivationKey>,
    disposed: bool,
}

impl PrivateDerivationKey {
    /// Build a key from borrowed scalar and chain code bytes.
    ///
    /// Both inputs are copied; later changes to the caller's buffers do not
    /// affect the key.
    pub fn new(scalar: &[u8], chain_code: &[u8]) -> Result<Self> {
        if scalar.len() != SCALAR_LEN {
            return Err(Error::key_creation(
                KeyField::Scalar,
                format!("expected {SCALAR_LEN} bytes, got {}", scalar.len()),
            ));
        }
        if chain_code.len() != CHAIN_CODE_LEN {
            return Err(Error::key_creation(
                KeyField::ChainCode,
                format!("expected {CHAIN_CODE_LEN} bytes, got {}", chain_code.len()),
            ));
        }

        let mut scalar_buf = [0u8; SCALAR_LEN];
        let mut chain_buf = [0u8; CHAIN_CODE_LEN];
        scalar_buf.copy_from_slice(scalar);
        chain_buf.copy_from_slice(chain_code);
        Self::from_parts(&mut scalar_buf, chain_buf)
    }

    /// Build a key from a scalar buffer handed over by the caller.
    ///
    /// The key keeps its own copy; `scalar` is zeroed before returning,
    /// whether or not it was valid.
    pub fn from_parts(
        scalar: &mut [u8; SCALAR_LEN],
        chain_code: [u8; CHAIN_CODE_LEN],
    ) -> Result<Self> {
        let checked = scalar_from_bytes(scalar).map(|_| Self::from_validated(*scalar, chain_code));
        wipe(scalar);
        checked
    }

    pub(crate) fn from_secret_scalar(
        scalar: Scalar<Secret, NonZero>,
        chain_code: [u8; CHAIN_CODE_LEN],
    ) -> Self {
        Self::from_validated(scalar.to_bytes(), chain_code)
    }

    fn from_validated(scalar: [u8; SCALAR_LEN], chain_code: [u8; CHAIN_CODE_LEN]) -> Self {
        Self {
            scalar,
            chain_code,
            public: OnceCell::new(),
            disposed: false,
        }
    }

    /// Copy of the big-endian scalar, wiped when the returned buffer drops.
    pub fn scalar(&self) -> Result<Zeroizing<[u8; SCALAR_LEN]>> {
        self.ensure_live()?;
        Ok(Zeroizing::new(self.scalar))
    }

    /// Copy of the chain code.
    pub fn chain_code(&self) -> Result<[u8; CHAIN_CODE_LEN]> {
        self.ensure_live()?;
        Ok(self.chain_code)
    }

    /// The public projection `scalar·G` with the same chain code.
    pub fn public_key(&self) -> Result<&PublicDerivationKey> {
        self.ensure_live()?;
        if let Some(public) = self.public.get() {
            return Ok(public);
        }

        let public = PublicDerivationKey::from_secret_scalar(self.secret_scalar()?, self.chain_code);
        Ok(self.public.get_or_init(|| public))
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Wipe the secret material and mark the key unusable.
    ///
    /// Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!("disposing private derivation key");
        }
        self.zeroize();
        self.disposed = true;
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::Disposed);
        }
        Ok(())
    }

    pub(crate) fn secret_scalar(&self) -> Result<Scalar<Secret, NonZero>> {
        self.ensure_live()?;
        scalar_from_bytes(&self.scalar)
    }
}

impl Zeroize for PrivateDerivationKey {
    fn zeroize(&mut self) {
        let Self {
            scalar,
            chain_code,
            public,
            disposed: _,
        } = self;

        scalar.zeroize();
        chain_code.zeroize();
        // The projection carries no secret, but it must not outlive the key.
        public.take();
    }
}

impl Drop for PrivateDerivationKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateDerivationKey {}

impl PartialEq for PrivateDerivationKey {
    fn eq(&self, other: &Self) -> bool {
        match (self.disposed, other.disposed) {
            (false, false) => {
                // Non-short-circuiting so both comparisons always run.
                constant_time_eq(&self.scalar, &other.scalar)
                    & constant_time_eq(&self.chain_code, &other.chain_code)
            }
            (true, true) => true,
            _ => false,
        }
    }
}

impl Eq for PrivateDerivationKey {}

impl Hash for PrivateDerivationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.public_key() {
            Ok(public) => public.hash(state),
            Err(_) => state.write_u8(0),
        }
    }
}

impl fmt::Debug for PrivateDerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("PrivateDerivationKey");
        match self.public_key() {
            Ok(public) => s.field("fingerprint", &hex::encode(public.fingerprint())),
            Err(_) => s.field("disposed", &true),
        };
        s.finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn sample_key() -> PrivateDerivationKey {
        PrivateDerivationKey::from_parts(&mut [0x11; 32], [0x22; 32]).unwrap()
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn valid_key_round_trips_accessors() {
        let key = sample_key();
        assert_eq!(*key.scalar().unwrap(), [0x11; 32]);
        assert_eq!(key.chain_code().unwrap(), [0x22; 32]);
        assert!(!key.is_disposed());
    }

    #[test]
    fn zero_scalar_is_rejected() {
        let err = PrivateDerivationKey::from_parts(&mut [0u8; 32], [0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            Error::KeyCreation {
                field: KeyField::Scalar,
                ..
            }
        ));
    }

    #[test]
    fn scalar_at_curve_order_is_rejected() {
        let err = {
            let mut order = crate::crypto::curve::CURVE_ORDER;
            PrivateDerivationKey::from_parts(&mut order, [0u8; 32]).unwrap_err()
        };
        assert!(matches!(
            err,
            Error::KeyCreation {
                field: KeyField::Scalar,
                ..
            }
        ));
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        let err = PrivateDerivationKey::new(&[1u8; 31], &[0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            Error::KeyCreation {
                field: KeyField::Scalar,
                ..
            }
        ));

        let err = PrivateDerivationKey::new(&[1u8; 32], &[0u8; 33]).unwrap_err();
        assert!(matches!(
            err,
            Error::KeyCreation {
                field: KeyField::ChainCode,
                ..
            }
        ));
    }

    #[test]
    fn key_does_not_alias_caller_buffers() {
        let mut scalar = vec![0x11u8; 32];
        let mut chain_code = vec![0x22u8; 32];
        let key = PrivateDerivationKey::new(&scalar, &chain_code).unwrap();

        scalar.fill(0x99);
        chain_code.fill(0x99);

        assert_eq!(*key.scalar().unwrap(), [0x11; 32]);
        assert_eq!(key.chain_code().unwrap(), [0x22; 32]);
    }

    #[test]
    fn from_parts_zeroes_caller_scalar() {
        let mut scalar = [0x11u8; 32];
        let key = PrivateDerivationKey::from_parts(&mut scalar, [0x22; 32]).unwrap();
        assert_eq!(scalar, [0u8; 32]);
        assert_eq!(*key.scalar().unwrap(), [0x11; 32]);

        let mut order = crate::crypto::curve::CURVE_ORDER;
        assert!(PrivateDerivationKey::from_parts(&mut order, [0x22; 32]).is_err());
        assert_eq!(order, [0u8; 32]);
    }

    #[test]
    fn public_projection_is_cached() {
        let key = sample_key();
        let first = key.public_key().unwrap() as *const PublicDerivationKey;
        let second = key.public_key().unwrap() as *const PublicDerivationKey;
        assert_eq!(first, second);
    }

    #[test]
    fn public_projection_matches_scalar_multiplication() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = PrivateDerivationKey::from_parts(&mut one, [0u8; 32]).unwrap();
        assert_eq!(
            key.public_key().unwrap().to_compressed(),
            crate::crypto::curve::GENERATOR_COMPRESSED
        );
    }

    #[test]
    fn disposed_key_rejects_every_accessor() {
        let mut key = sample_key();
        key.public_key().unwrap();
        key.dispose();

        assert!(key.is_disposed());
        assert!(matches!(key.scalar(), Err(Error::Disposed)));
        assert!(matches!(key.chain_code(), Err(Error::Disposed)));
        assert!(matches!(key.public_key(), Err(Error::Disposed)));
        assert!(matches!(key.to_bytes(), Err(Error::Disposed)));
    }

    #[test]
    fn dispose_wipes_buffers_and_is_idempotent() {
        let mut key = sample_key();
        key.dispose();
        key.dispose();

        assert_eq!(key.scalar, [0u8; 32]);
        assert_eq!(key.chain_code, [0u8; 32]);
        assert!(key.public.get().is_none());
    }

    #[test]
    fn equality_is_by_value() {
        let a = sample_key();
        let b = sample_key();
        let c = PrivateDerivationKey::from_parts(&mut [0x11; 32], [0x23; 32]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn disposed_key_only_equals_disposed_key() {
        let live = sample_key();
        let mut gone = sample_key();
        gone.dispose();
        let mut also_gone = sample_key();
        also_gone.dispose();

        assert_ne!(live, gone);
        assert_eq!(gone, also_gone);
    }

    #[test]
    fn hash_follows_public_projection() {
        let key = sample_key();
        let public = *key.public_key().unwrap();
        assert_eq!(hash_of(&key), hash_of(&public));
        assert_eq!(hash_of(&key), hash_of(&sample_key()));
    }

    #[test]
    fn disposing_a_clone_leaves_original_intact() {
        let original = sample_key();
        let mut copy = original.clone();
        copy.dispose();

        assert!(!original.is_disposed());
        assert_eq!(*original.scalar().unwrap(), [0x11; 32]);
    }

    #[test]
    fn debug_output_hides_scalar() {
        let key = sample_key();
        let printed = format!("{key:?}");
        assert!(printed.contains("fingerprint"));
        assert!(!printed.contains(&hex::encode([0x11u8; 32])));
    }
}
