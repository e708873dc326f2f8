//! secp256k1 domain parameters and fixed byte lengths.

/// Length of a big-endian private scalar.
pub const SCALAR_LEN: usize = 32;

/// Length of a chain code.
pub const CHAIN_CODE_LEN: usize = 32;

/// Length of a SEC1 compressed point.
pub const COMPRESSED_POINT_LEN: usize = 33;

/// Length of the private key wire form: scalar ∥ chain code.
pub const PRIVATE_KEY_LEN: usize = SCALAR_LEN + CHAIN_CODE_LEN;

/// Length of the public key wire form: compressed point ∥ chain code.
pub const PUBLIC_KEY_LEN: usize = COMPRESSED_POINT_LEN + CHAIN_CODE_LEN;

/// First index of the hardened range (2^31).
pub const HARDENED_INDEX_BOUNDARY: u32 = 0x8000_0000;

/// BIP-32 HMAC key used to turn seed bytes into a master key.
pub const MASTER_SEED_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// BIP-44 purpose field.
pub const BIP44_PURPOSE: u32 = 44;

/// Group order N.
pub const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Field prime p = 2^256 - 2^32 - 977.
pub const FIELD_PRIME: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

/// Generator point G in compressed form.
pub const GENERATOR_COMPRESSED: [u8; COMPRESSED_POINT_LEN] = [
    0x02, 0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
    0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17,
    0x98,
];
