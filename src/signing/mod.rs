//! Signature engine for proof-of-work messages

pub mod engine;

pub use engine::{EngineError, SignatureConfig, SignatureEngine, SignedProof};
