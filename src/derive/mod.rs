//! Derivation Engines
//!
//! - **tag**: children addressed by an arbitrary UTF-8 tag
//! - **index**: BIP-32 single steps addressed by a child number
//! - **path**: multi-level paths, including the BIP-44 five-level layout
//!
//! Every private operation has a public twin that yields the projection of
//! the private result for the same parent and address.

pub mod index;
pub mod path;
pub mod tag;

pub use index::{derive_private_child, derive_private_child_number, derive_public_child, ChildNumber};
pub use path::{derive_private_bip44, derive_private_path, derive_public_path, Bip44Path, DerivationPath};
pub use tag::{derive_private_tagged, derive_public_tagged};
