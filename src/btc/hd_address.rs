//! Bitcoin Export of Derived Keys
//!
//! Converts derivation keys into the formats standard Bitcoin tooling reads
//! (WIF private keys, P2PKH / P2WPKH addresses), and enumerates BIP-44
//! receiving addresses from the account-level public key alone.
//!
//! ## Usage
//!
//! ```ignore
//! let master = MasterKey::from_mnemonic(words, "")?;
//! let (address, pubkey_hex) =
//!     derive_bip44_address(&master, &Bip44Path::receive(0, 0, 0), Network::Bitcoin)?;
//! ```

use bitcoin::secp256k1::{PublicKey, SecretKey};
use bitcoin::{Address, CompressedPublicKey, Network, PrivateKey};

use crate::derive::{
    derive_private_bip44, derive_private_path, derive_public_child, Bip44Path, ChildNumber,
};
use crate::error::{Error, KeyField, Result};
use crate::keys::{MasterKey, PrivateDerivationKey, PublicDerivationKey};

/// Most addresses [`list_receive_addresses`] returns in one call.
pub const MAX_ADDRESS_COUNT: u32 = 1000;

// ============================================================================
// Key Conversion
// ============================================================================

impl PrivateDerivationKey {
    /// The scalar as a `secp256k1` secret key.
    pub fn to_secret_key(&self) -> Result<SecretKey> {
        let scalar = self.scalar()?;
        SecretKey::from_slice(&scalar[..])
            .map_err(|e| Error::key_creation(KeyField::Scalar, e.to_string()))
    }

    /// Compressed-key WIF encoding for `network`.
    pub fn to_wif(&self, network: Network) -> Result<String> {
        let scalar = self.scalar()?;
        let key = PrivateKey::from_slice(&scalar[..], network)
            .map_err(|e| Error::key_creation(KeyField::Scalar, e.to_string()))?;
        Ok(key.to_wif())
    }
}

impl PublicDerivationKey {
    /// The point as a `secp256k1` public key.
    pub fn to_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_slice(&self.to_compressed())
            .map_err(|e| Error::key_creation(KeyField::Point, e.to_string()))
    }

    /// The point as a compressed Bitcoin public key.
    pub fn to_compressed_public_key(&self) -> Result<CompressedPublicKey> {
        CompressedPublicKey::from_slice(&self.to_compressed())
            .map_err(|e| Error::key_creation(KeyField::Point, e.to_string()))
    }

    /// Legacy pay-to-pubkey-hash address.
    pub fn p2pkh_address(&self, network: Network) -> Result<Address> {
        let key = self.to_compressed_public_key()?;
        Ok(Address::p2pkh(key.pubkey_hash(), network))
    }

    /// Native SegWit v0 pay-to-witness-pubkey-hash address.
    pub fn p2wpkh_address(&self, network: Network) -> Result<Address> {
        let key = self.to_compressed_public_key()?;
        Ok(Address::p2wpkh(&key, network))
    }
}

// ============================================================================
// Address Derivation
// ============================================================================

/// Derive the P2PKH address at a BIP-44 path.
///
/// Returns (address, pubkey_hex).
pub fn derive_bip44_address(
    master: &MasterKey,
    path: &Bip44Path,
    network: Network,
) -> Result<(Address, String)> {
    let leaf = derive_private_bip44(master, path.coin, path.account, path.channel, path.index)?;
    let public = leaf.public_key()?;
    let address = public.p2pkh_address(network)?;
    Ok((address, hex::encode(public.to_compressed())))
}

/// List the first `count` receiving addresses of an account.
///
/// Only the account key is derived privately; the receive chain is walked
/// from its public key. Returns Vec of (address_string, pubkey_hex, index).
///
/// `count` above [`MAX_ADDRESS_COUNT`] is rejected with
/// [`Error::InvalidArgument`].
pub fn list_receive_addresses(
    master: &MasterKey,
    coin: u32,
    account: u32,
    count: u32,
    network: Network,
) -> Result<Vec<(String, String, u32)>> {
    if count > MAX_ADDRESS_COUNT {
        return Err(Error::InvalidArgument(format!(
            "address count {count} exceeds the limit of {MAX_ADDRESS_COUNT}"
        )));
    }

    let account_path = Bip44Path::receive(coin, account, 0).account_path()?;
    let account_key = derive_private_path(master, &account_path)?;
    let receive_chain = derive_public_child(account_key.public_key()?, ChildNumber::Normal(0))?;

    let mut addresses = Vec::with_capacity(count as usize);
    for i in 0..count {
        let leaf = derive_public_child(&receive_chain, ChildNumber::normal(i)?)?;
        let address = leaf.p2pkh_address(network)?;
        addresses.push((address.to_string(), hex::encode(leaf.to_compressed()), i));
    }

    Ok(addresses)
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse network string to bitcoin::Network
pub fn parse_network(network_str: &str) -> Result<Network> {
    match network_str.to_lowercase().as_str() {
        "mainnet" | "main" | "bitcoin" => Ok(Network::Bitcoin),
        "testnet" | "test" | "testnet3" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" | "local" => Ok(Network::Regtest),
        _ => Err(Error::InvalidArgument(format!(
            "unknown network '{network_str}', use: mainnet, testnet, signet, or regtest"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
