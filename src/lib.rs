//! Hierarchical deterministic keys on secp256k1.
//!
//! Children are addressed either by an arbitrary UTF-8 tag or by a BIP-32
//! child number. Each private derivation has a public counterpart, so a
//! holder of only a public key can compute every non-hardened child's public
//! key.

pub mod btc;
pub mod crypto;
pub mod derive;
pub mod error;
pub mod keys;

pub use btc::{derive_bip44_address, list_receive_addresses, parse_network, MAX_ADDRESS_COUNT};
pub use crypto::curve::{
    BIP44_PURPOSE, CHAIN_CODE_LEN, COMPRESSED_POINT_LEN, HARDENED_INDEX_BOUNDARY, PRIVATE_KEY_LEN,
    PUBLIC_KEY_LEN, SCALAR_LEN,
};
pub use crypto::secure::{constant_time_eq, wipe};
pub use derive::{
    derive_private_bip44, derive_private_child, derive_private_child_number, derive_private_path,
    derive_private_tagged, derive_public_child, derive_public_path, derive_public_tagged,
    Bip44Path, ChildNumber, DerivationPath,
};
pub use error::{Error, KeyField, Result};
pub use keys::{MasterKey, PrivateDerivationKey, PublicDerivationKey};
