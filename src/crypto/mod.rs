//! Cryptographic Primitives
//!
//! - **curve**: secp256k1 domain constants and wire lengths
//! - **secure**: constant-time comparison, zeroing, HMAC-SHA512
//! - **mnemonic**: BIP-39 phrase to BIP-32 master material

pub mod curve;
pub mod mnemonic;
pub mod secure;
