//! Pow-Signer: proof-of-work search and RSA sign/verify in Rust
//!
//! This crate provides:
//! - A SHA-256 proof-of-work search over `base + nonce` candidates
//! - Progress notifications through a pluggable observer
//! - RSA key generation, PKCS#1 v1.5 signing and verification
//! - A signature engine that signs a freshly mined message
//!
//! # Example
//!
//! ```rust
//! use pow_signer::crypto::{generate_key_pair, verify};
//! use pow_signer::mining::search;
//!
//! // Find a message whose hash starts with "00"
//! let result = search("sinycat", 2).unwrap();
//! println!("{} -> {} (nonce {})", result.message, result.digest, result.nonce);
//!
//! // Sign it and check the signature
//! let keys = generate_key_pair(1024).unwrap();
//! let signature = keys.sign(result.message.as_bytes()).unwrap();
//! assert!(verify(result.message.as_bytes(), &signature, keys.public_key()).unwrap());
//! ```

pub mod cli;
pub mod crypto;
pub mod mining;
pub mod signing;

// Re-export commonly used types
pub use crypto::{KeyError, KeyPair, Signature, DEFAULT_KEY_BITS};
pub use mining::{
    search, Miner, MinerConfig, PowError, PowResult, ProgressObserver, SearchProgress,
    DEFAULT_BASE, DEFAULT_DIFFICULTY,
};
pub use signing::{EngineError, SignatureConfig, SignatureEngine, SignedProof};
