//! SHA-256 hashing and difficulty checks
//!
//! Difficulty is measured in leading zero hex characters of the digest,
//! so a SHA-256 digest supports at most 64.

use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest in bytes
pub const DIGEST_LEN: usize = 32;

/// Highest satisfiable difficulty (hex characters in a SHA-256 digest)
pub const MAX_DIFFICULTY: usize = DIGEST_LEN * 2;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Counts the leading '0' characters of the digest's hex form
pub fn leading_zero_nibbles(digest: &[u8]) -> usize {
    let mut count = 0;

    for byte in digest {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if *byte >> 4 == 0 {
            count += 1;
        }
        break;
    }

    count
}

/// Checks if a digest meets the difficulty target
///
/// Equivalent to `hex::encode(digest).starts_with(&"0".repeat(difficulty))`
/// without encoding the digest.
pub fn meets_difficulty(digest: &[u8], difficulty: usize) -> bool {
    let full_bytes = difficulty / 2;
    let half_byte = difficulty % 2 == 1;

    if full_bytes + usize::from(half_byte) > digest.len() {
        return false;
    }

    if digest[..full_bytes].iter().any(|byte| *byte != 0) {
        return false;
    }

    !half_byte || digest[full_bytes] >> 4 == 0
}
