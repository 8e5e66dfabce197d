//! RSA key management
//!
//! Provides key pair generation, signing, and verification using
//! RSA with PKCS#1 v1.5 padding over a SHA-256 message digest.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1v15::{Signature as RsaSignature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

use super::hash::sha256_hex;

/// Smallest modulus size accepted for key generation
pub const MIN_KEY_BITS: usize = 1024;

/// Largest modulus size accepted for key generation
pub const MAX_KEY_BITS: usize = 4096;

/// Modulus size used when none is given
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Unsupported key size: {0} bits (expected a multiple of 8 in 1024..=4096)")]
    UnsupportedKeySize(usize),
    #[error("Key generation failed: {0}")]
    KeyGeneration(#[source] rsa::Error),
    #[error("Signing failed: {0}")]
    Signing(#[source] rsa::signature::Error),
    #[error("Malformed signature: expected {expected} bytes, got {actual}")]
    MalformedSignature { expected: usize, actual: usize },
}

/// A detached RSA signature
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex rendering for display
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl KeyPair {
    /// Generate a new random key pair from the operating system RNG
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        generate_key_pair(bits)
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.public_key.n().bits()
    }

    /// Short identifier for the public key
    pub fn fingerprint(&self) -> String {
        public_key_fingerprint(&self.public_key)
    }

    /// Sign a message with the private key
    pub fn sign(&self, message: &[u8]) -> Result<Signature, KeyError> {
        sign(message, &self.private_key)
    }

    /// Verify a signature against this key pair's public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<bool, KeyError> {
        verify(message, signature, &self.public_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

/// Generate a fresh key pair of `bits` size using `OsRng`
pub fn generate_key_pair(bits: usize) -> Result<KeyPair, KeyError> {
    generate_key_pair_with_rng(&mut OsRng, bits)
}

/// Generate a fresh key pair of `bits` size from the given RNG
pub fn generate_key_pair_with_rng<R>(rng: &mut R, bits: usize) -> Result<KeyPair, KeyError>
where
    R: CryptoRng + RngCore,
{
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) || bits % 8 != 0 {
        return Err(KeyError::UnsupportedKeySize(bits));
    }

    let private_key = RsaPrivateKey::new(rng, bits).map_err(KeyError::KeyGeneration)?;
    let public_key = RsaPublicKey::from(&private_key);

    Ok(KeyPair {
        private_key,
        public_key,
    })
}

/// SHA-256 of the big-endian modulus, hex encoded
pub fn public_key_fingerprint(public_key: &RsaPublicKey) -> String {
    sha256_hex(&public_key.n().to_bytes_be())
}

/// Sign a message with a private key
///
/// The message is hashed with SHA-256 before signing, so there is no
/// length limit on `message`.
pub fn sign(message: &[u8], private_key: &RsaPrivateKey) -> Result<Signature, KeyError> {
    let signing_key = SigningKey::<Sha256>::new(private_key.clone());
    let signature = signing_key.try_sign(message).map_err(KeyError::Signing)?;
    Ok(Signature(signature.to_vec()))
}

/// Verify a signature against a public key
///
/// Returns `Ok(false)` for any well-formed signature that does not match.
/// Only a signature whose length differs from the modulus size is an error.
pub fn verify(
    message: &[u8],
    signature: &Signature,
    public_key: &RsaPublicKey,
) -> Result<bool, KeyError> {
    let expected = public_key.size();
    if signature.len() != expected {
        return Err(KeyError::MalformedSignature {
            expected,
            actual: signature.len(),
        });
    }

    let sig = RsaSignature::try_from(signature.as_bytes()).map_err(|_| {
        KeyError::MalformedSignature {
            expected,
            actual: signature.len(),
        }
    })?;

    let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
    Ok(verifying_key.verify(message, &sig).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn test_keys() -> &'static KeyPair {
        static KEYS: OnceLock<KeyPair> = OnceLock::new();
        KEYS.get_or_init(|| generate_key_pair(MIN_KEY_BITS).unwrap())
    }

    fn other_keys() -> &'static KeyPair {
        static KEYS: OnceLock<KeyPair> = OnceLock::new();
        KEYS.get_or_init(|| generate_key_pair(MIN_KEY_BITS).unwrap())
    }

    #[test]
    fn test_key_pair_generation() {
        let kp = test_keys();
        assert_eq!(kp.bits(), MIN_KEY_BITS);
        assert_eq!(kp.fingerprint().len(), 64);
    }

    #[test]
    fn test_independent_key_pairs() {
        assert_ne!(test_keys().public_key(), other_keys().public_key());
        assert_ne!(test_keys().fingerprint(), other_keys().fingerprint());
    }

    #[test]
    fn test_unsupported_key_sizes() {
        for bits in [0, 512, MIN_KEY_BITS + 1, MAX_KEY_BITS + 8] {
            assert!(matches!(
                generate_key_pair(bits),
                Err(KeyError::UnsupportedKeySize(b)) if b == bits
            ));
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = test_keys();
        let message = b"Hello, blockchain!";

        let signature = kp.sign(message).unwrap();
        assert_eq!(signature.len(), MIN_KEY_BITS / 8);
        assert!(kp.verify(message, &signature).unwrap());
    }

    #[test]
    fn test_verify_rejects_other_message() {
        let kp = test_keys();
        let signature = kp.sign(b"sinycat123").unwrap();

        assert!(!kp.verify(b"sinycat124", &signature).unwrap());
        assert!(!kp.verify(b"", &signature).unwrap());
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let message = b"sinycat";
        let signature = test_keys().sign(message).unwrap();

        assert!(!verify(message, &signature, other_keys().public_key()).unwrap());
    }

    #[test]
    fn test_verify_rejects_flipped_byte() {
        let kp = test_keys();
        let message = b"sinycat";
        let signature = kp.sign(message).unwrap();

        let mut bytes = signature.as_bytes().to_vec();
        *bytes.last_mut().unwrap() ^= 0x01;
        assert!(!kp.verify(message, &Signature::from(bytes)).unwrap());

        let mut bytes = signature.as_bytes().to_vec();
        bytes[0] ^= 0x80;
        assert!(!kp.verify(message, &Signature::from(bytes)).unwrap());
    }

    #[test]
    fn test_verify_malformed_length() {
        let kp = test_keys();
        let signature = kp.sign(b"sinycat").unwrap();

        let mut short = signature.as_bytes().to_vec();
        short.pop();
        assert!(matches!(
            kp.verify(b"sinycat", &Signature::from(short)),
            Err(KeyError::MalformedSignature { expected: 128, actual: 127 })
        ));
        assert!(kp.verify(b"sinycat", &Signature::from(Vec::new())).is_err());
    }

    #[test]
    fn test_verify_is_repeatable() {
        let kp = test_keys();
        let signature = kp.sign(b"repeat").unwrap();

        for _ in 0..3 {
            assert!(kp.verify(b"repeat", &signature).unwrap());
            assert!(!kp.verify(b"repeat!", &signature).unwrap());
        }
    }
}
