//! BIP-39 Seed Adapter
//!
//! Turns a mnemonic phrase into the 32 + 32 bytes of master key material the
//! derivation core consumes. Word generation is left to wallet tooling; this
//! module only parses, stretches and splits.
//!
//! ## Usage
//!
//! ```ignore
//! let mnemonic = parse_mnemonic(words)?;
//! let seed = mnemonic_to_seed(&mnemonic, "");
//! let (scalar, chain_code) = seed_to_master_parts(&seed[..])?;
//! ```

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::crypto::curve::{CHAIN_CODE_LEN, MASTER_SEED_HMAC_KEY, SCALAR_LEN};
use crate::crypto::secure::{hmac_sha512, split_hmac_output};
use crate::error::{Error, Result};

/// Shortest seed BIP-32 accepts (128 bits).
pub const MIN_SEED_LEN: usize = 16;

/// Longest seed BIP-32 accepts (512 bits).
pub const MAX_SEED_LEN: usize = 64;

// ============================================================================
// Mnemonic Parsing
// ============================================================================

/// Parse mnemonic from space-separated English words (checksum validated).
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic> {
    Ok(Mnemonic::parse_in(Language::English, words)?)
}

// ============================================================================
// BIP-39 / BIP-32 Seed Derivation
// ============================================================================

/// Convert mnemonic to 512-bit seed using BIP-39 PBKDF2.
///
/// Different passphrases produce unrelated seeds.
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Zeroizing<[u8; 64]> {
    Zeroizing::new(mnemonic.to_seed(passphrase))
}

/// Split seed bytes into master scalar and chain code.
///
/// Follows BIP-32: `HMAC-SHA512("Bitcoin seed", seed)`.
pub fn seed_to_master_parts(
    seed: &[u8],
) -> Result<(Zeroizing<[u8; SCALAR_LEN]>, [u8; CHAIN_CODE_LEN])> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(Error::InvalidArgument(format!(
            "seed must be {MIN_SEED_LEN}..={MAX_SEED_LEN} bytes, got {}",
            seed.len()
        )));
    }

    let output = hmac_sha512(MASTER_SEED_HMAC_KEY, &[seed]);
    Ok(split_hmac_output(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_parse_valid_mnemonic() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
    }

    #[test]
    fn test_parse_invalid_mnemonic() {
        let result = parse_mnemonic("invalid words that are not in the bip39 wordlist");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let words = ["abandon"; 12].join(" ");
        assert!(matches!(
            parse_mnemonic(&words),
            Err(Error::InvalidArgument(_))
        ));
        assert!(parse_mnemonic(ABANDON).is_ok());
    }

    #[test]
    fn test_seed_matches_bip39_vector() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        let seed = mnemonic_to_seed(&mnemonic, "TREZOR");
        assert_eq!(
            hex::encode(&seed[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        assert_ne!(
            *mnemonic_to_seed(&mnemonic, ""),
            *mnemonic_to_seed(&mnemonic, "secret")
        );
    }

    #[test]
    fn test_seed_to_master_parts_bip32_vector_1() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let (scalar, chain_code) = seed_to_master_parts(&seed).unwrap();
        assert_eq!(
            hex::encode(&scalar[..]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(chain_code),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(seed_to_master_parts(&[0u8; 15]).is_err());
        assert!(seed_to_master_parts(&[0u8; 16]).is_ok());
        assert!(seed_to_master_parts(&[0u8; 64]).is_ok());
        assert!(matches!(
            seed_to_master_parts(&[0u8; 65]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
