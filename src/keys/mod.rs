//! Derivation Key Types
//!
//! - **PrivateDerivationKey**: secret scalar + chain code, disposable
//! - **PublicDerivationKey**: curve point + chain code
//! - **MasterKey**: a private key marked as the root of a hierarchy
//!
//! Both key types have a fixed-width wire form (see [`encoding`]).

pub mod encoding;
pub mod master;
pub mod private;
pub mod public;

pub use master::MasterKey;
pub use private::PrivateDerivationKey;
pub use public::PublicDerivationKey;
