//! Sign/verify flow over a proof-of-work message
//!
//! Generates a key pair, mines a qualified message, signs it with the
//! private key and checks the signature with the public key.

use crate::crypto::{
    public_key_fingerprint, verify, KeyError, KeyPair, Signature, DEFAULT_KEY_BITS,
};
use crate::mining::{
    Miner, MinerConfig, NoProgress, PowError, PowResult, ProgressObserver, DEFAULT_BASE,
    DEFAULT_DIFFICULTY, DEFAULT_PROGRESS_INTERVAL_SECS,
};
use log::info;
use rsa::RsaPublicKey;
use std::time::Duration;
use thiserror::Error;

/// Errors from the sign/verify flow
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Proof of work failed: {0}")]
    Pow(#[from] PowError),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

/// Signature engine configuration
#[derive(Debug, Clone)]
pub struct SignatureConfig {
    /// Base string the nonce is appended to
    pub base: String,
    /// Required leading zero hex characters
    pub difficulty: usize,
    /// RSA modulus size
    pub key_bits: usize,
    /// Minimum time between progress notifications
    pub progress_interval: Duration,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            difficulty: DEFAULT_DIFFICULTY,
            key_bits: DEFAULT_KEY_BITS,
            progress_interval: Duration::from_secs(DEFAULT_PROGRESS_INTERVAL_SECS),
        }
    }
}

/// A proof-of-work message signed by a freshly generated key
#[derive(Debug, Clone)]
pub struct SignedProof {
    pub pow: PowResult,
    pub signature: Signature,
    pub public_key: RsaPublicKey,
    /// Outcome of checking `signature` against `public_key`
    pub verified: bool,
}

impl SignedProof {
    pub fn fingerprint(&self) -> String {
        public_key_fingerprint(&self.public_key)
    }

    /// Re-check both the proof of work and the signature
    pub fn verify(&self) -> Result<bool, KeyError> {
        if !self.pow.verify() {
            return Ok(false);
        }
        verify(self.pow.message.as_bytes(), &self.signature, &self.public_key)
    }
}

/// Runs key generation, mining, signing and verification in order
#[derive(Debug, Clone, Default)]
pub struct SignatureEngine {
    config: SignatureConfig,
}

impl SignatureEngine {
    pub fn new(config: SignatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Run the flow without progress notifications
    pub fn run(&self) -> Result<SignedProof, EngineError> {
        self.run_with_observer(&mut NoProgress)
    }

    /// Run the flow, forwarding mining progress to `observer`
    pub fn run_with_observer(
        &self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SignedProof, EngineError> {
        let miner = Miner::new(
            &self.config.base,
            MinerConfig {
                difficulty: self.config.difficulty,
                progress_interval: self.config.progress_interval,
                max_attempts: None,
            },
        )?;

        info!("Generating {}-bit RSA key pair...", self.config.key_bits);
        let keys = KeyPair::generate(self.config.key_bits)?;
        info!("Key pair ready ({})", keys.fingerprint());

        let pow = miner.mine_with_observer(observer)?;

        let signature = keys.sign(pow.message.as_bytes())?;
        info!("Signed {:?} ({} bytes)", pow.message, signature.len());

        let verified = keys.verify(pow.message.as_bytes(), &signature)?;
        info!(
            "Signature verification: {}",
            if verified { "valid" } else { "invalid" }
        );

        Ok(SignedProof {
            pow,
            signature,
            public_key: keys.public_key().clone(),
            verified,
        })
    }
}
