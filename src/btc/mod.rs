//! Bitcoin Integration
//!
//! - **hd_address**: WIF / address export and BIP-44 address listing

pub mod hd_address;

pub use hd_address::{
    derive_bip44_address, list_receive_addresses, parse_network, MAX_ADDRESS_COUNT,
};
