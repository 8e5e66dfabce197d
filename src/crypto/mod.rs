//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 hashing and difficulty checks
//! - RSA key management (PKCS#1 v1.5 signatures)

pub mod hash;
pub mod keys;

pub use hash::{
    leading_zero_nibbles, meets_difficulty, sha256, sha256_hex, DIGEST_LEN, MAX_DIFFICULTY,
};
pub use keys::{
    generate_key_pair, generate_key_pair_with_rng, public_key_fingerprint, sign, verify,
    KeyError, KeyPair, Signature, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS,
};
