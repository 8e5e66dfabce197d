//! Proof-of-work search
//!
//! Finds the smallest nonce such that `sha256(base + nonce)` starts with
//! `difficulty` zero hex characters.

use crate::crypto::{meets_difficulty, sha256, MAX_DIFFICULTY};
use crate::mining::progress::{NoProgress, ProgressObserver, SearchProgress};
use chrono::Local;
use log::{debug, info};
use serde::Serialize;
use std::fmt::Write;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Base string used when none is given
pub const DEFAULT_BASE: &str = "sinycat";

/// Difficulty used when none is given (leading zero hex characters)
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Seconds between progress notifications
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 10;

/// Attempts between wall-clock checks
const CLOCK_CHECK_INTERVAL: u128 = 1024;

/// Proof-of-work errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowError {
    #[error("Base string must not be empty")]
    EmptyBase,
    #[error("Difficulty {difficulty} exceeds the digest length of {max} hex characters")]
    DifficultyTooHigh { difficulty: usize, max: usize },
    #[error("No qualifying nonce within {attempts} attempts")]
    BudgetExhausted { attempts: u128 },
    #[error("Nonce space exhausted")]
    NonceSpaceExhausted,
}

/// Miner configuration
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Required leading zero hex characters
    pub difficulty: usize,
    /// Minimum time between progress notifications
    pub progress_interval: Duration,
    /// Stop after this many attempts instead of searching forever
    pub max_attempts: Option<u128>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            progress_interval: Duration::from_secs(DEFAULT_PROGRESS_INTERVAL_SECS),
            max_attempts: None,
        }
    }
}

impl MinerConfig {
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }
}

/// Outcome of a successful search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowResult {
    /// Qualified message (`base + nonce`)
    pub message: String,
    /// Lowercase hex SHA-256 of `message`
    pub digest: String,
    /// Nonce that produced the digest
    pub nonce: u128,
    /// Difficulty the digest satisfies
    pub difficulty: usize,
    /// Number of hash attempts (`nonce + 1`)
    pub attempts: u128,
    /// Wall-clock search time
    pub elapsed: Duration,
}

impl PowResult {
    /// Hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            self.attempts as f64
        }
    }

    /// Recompute the digest and check it against the difficulty
    pub fn verify(&self) -> bool {
        let digest = sha256(self.message.as_bytes());
        hex::encode(digest) == self.digest && meets_difficulty(&digest, self.difficulty)
    }
}

/// Proof-of-work miner for a fixed base string
#[derive(Debug, Clone)]
pub struct Miner {
    base: String,
    config: MinerConfig,
}

impl Miner {
    /// Create a new miner, rejecting unsatisfiable parameters
    pub fn new(base: &str, config: MinerConfig) -> Result<Self, PowError> {
        validate(base, config.difficulty)?;
        Ok(Self {
            base: base.to_string(),
            config,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Run the search without progress notifications
    pub fn mine(&self) -> Result<PowResult, PowError> {
        self.mine_with_observer(&mut NoProgress)
    }

    /// Run the search, notifying `observer` every `progress_interval`
    pub fn mine_with_observer(
        &self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<PowResult, PowError> {
        let difficulty = self.config.difficulty;
        let start = Instant::now();
        let mut last_report = start;
        let mut candidate = String::with_capacity(self.base.len() + 40);

        info!(
            "Searching for a nonce for {:?} with difficulty {}...",
            self.base, difficulty
        );

        for nonce in 0..=u128::MAX {
            if let Some(max) = self.config.max_attempts {
                if nonce >= max {
                    info!("Gave up after {} attempts", max);
                    return Err(PowError::BudgetExhausted { attempts: max });
                }
            }

            if nonce > 0 && nonce % CLOCK_CHECK_INTERVAL == 0 {
                let now = Instant::now();
                if now.duration_since(last_report) >= self.config.progress_interval {
                    last_report = now;
                    let progress = SearchProgress {
                        timestamp: Local::now(),
                        nonce,
                        attempts: nonce,
                        elapsed: now.duration_since(start),
                    };
                    debug!(
                        "Still searching at nonce {} ({:.2} H/s)",
                        nonce,
                        progress.hash_rate()
                    );
                    observer.on_progress(&progress);
                }
            }

            candidate.clear();
            candidate.push_str(&self.base);
            // Writing to a String cannot fail
            let _ = write!(candidate, "{}", nonce);

            let digest = sha256(candidate.as_bytes());
            if meets_difficulty(&digest, difficulty) {
                let result = PowResult {
                    message: candidate,
                    digest: hex::encode(digest),
                    nonce,
                    difficulty,
                    attempts: nonce.saturating_add(1),
                    elapsed: start.elapsed(),
                };

                info!(
                    "Found nonce {} in {}ms ({} attempts, {:.2} H/s)",
                    nonce,
                    result.elapsed.as_millis(),
                    result.attempts,
                    result.hash_rate()
                );

                return Ok(result);
            }
        }

        Err(PowError::NonceSpaceExhausted)
    }
}

fn validate(base: &str, difficulty: usize) -> Result<(), PowError> {
    if base.is_empty() {
        return Err(PowError::EmptyBase);
    }
    if difficulty > MAX_DIFFICULTY {
        return Err(PowError::DifficultyTooHigh {
            difficulty,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}

/// Search for the first nonce meeting `difficulty`
pub fn search(base: &str, difficulty: usize) -> Result<PowResult, PowError> {
    Miner::new(base, MinerConfig::with_difficulty(difficulty))?.mine()
}

/// Same as [`search`], reporting progress to `observer`
pub fn search_with_observer(
    base: &str,
    difficulty: usize,
    observer: &mut dyn ProgressObserver,
) -> Result<PowResult, PowError> {
    Miner::new(base, MinerConfig::with_difficulty(difficulty))?.mine_with_observer(observer)
}

/// Check that `base + nonce` meets `difficulty`
pub fn verify_pow(base: &str, nonce: u128, difficulty: usize) -> bool {
    let digest = sha256(format!("{}{}", base, nonce).as_bytes());
    meets_difficulty(&digest, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_meets_difficulty() {
        for difficulty in 0..=4 {
            let result = search(DEFAULT_BASE, difficulty).unwrap();

            assert!(result.digest.starts_with(&"0".repeat(difficulty)));
            assert_eq!(result.message, format!("{}{}", DEFAULT_BASE, result.nonce));
            assert_eq!(result.attempts, result.nonce + 1);
            assert!(result.verify());
        }
    }

    #[test]
    fn test_search_returns_smallest_nonce() {
        for difficulty in 0..=3 {
            let result = search(DEFAULT_BASE, difficulty).unwrap();
            for nonce in 0..result.nonce {
                assert!(
                    !verify_pow(DEFAULT_BASE, nonce, difficulty),
                    "nonce {nonce} already meets difficulty {difficulty}"
                );
            }
        }
    }

    #[test]
    fn test_sinycat_difficulty_two() {
        let result = search("sinycat", 2).unwrap();

        assert_eq!(&result.digest[..2], "00");
        assert_eq!(result.digest, hex::encode(sha256(result.message.as_bytes())));
        if result.nonce > 0 {
            let previous = sha256(format!("sinycat{}", result.nonce - 1).as_bytes());
            assert!(!hex::encode(previous).starts_with("00"));
        }
    }

    #[test]
    fn test_difficulty_zero_takes_first_nonce() {
        let result = search("abc", 0).unwrap();
        assert_eq!(result.nonce, 0);
        assert_eq!(result.message, "abc0");
    }

    #[test]
    fn test_search_is_deterministic() {
        let first = search(DEFAULT_BASE, 3).unwrap();
        let second = search(DEFAULT_BASE, 3).unwrap();

        assert_eq!(first.message, second.message);
        assert_eq!(first.digest, second.digest);
        assert_eq!(first.nonce, second.nonce);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert_eq!(search("", 1), Err(PowError::EmptyBase));
        assert_eq!(
            search(DEFAULT_BASE, MAX_DIFFICULTY + 1),
            Err(PowError::DifficultyTooHigh {
                difficulty: MAX_DIFFICULTY + 1,
                max: MAX_DIFFICULTY,
            })
        );
    }

    #[test]
    fn test_budget_exhausted() {
        let config = MinerConfig {
            difficulty: 8,
            max_attempts: Some(100),
            ..Default::default()
        };
        let miner = Miner::new(DEFAULT_BASE, config).unwrap();

        assert_eq!(
            miner.mine(),
            Err(PowError::BudgetExhausted { attempts: 100 })
        );
    }

    #[test]
    fn test_budget_large_enough() {
        let expected = search(DEFAULT_BASE, 2).unwrap();
        let config = MinerConfig {
            difficulty: 2,
            max_attempts: Some(expected.attempts),
            ..Default::default()
        };

        let result = Miner::new(DEFAULT_BASE, config).unwrap().mine().unwrap();
        assert_eq!(result.nonce, expected.nonce);
    }

    #[test]
    fn test_observer_receives_progress() {
        let config = MinerConfig {
            difficulty: 4,
            progress_interval: Duration::ZERO,
            max_attempts: None,
        };
        let miner = Miner::new(DEFAULT_BASE, config).unwrap();

        let mut ticks: Vec<u128> = Vec::new();
        let mut observer = |p: &SearchProgress| ticks.push(p.nonce);
        let result = miner.mine_with_observer(&mut observer).unwrap();

        assert_eq!(ticks.len() as u128, result.nonce / CLOCK_CHECK_INTERVAL);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert!(ticks.iter().all(|n| n % CLOCK_CHECK_INTERVAL == 0));
    }

    #[test]
    fn test_search_with_observer_matches_search() {
        let mut silent = NoProgress;
        let observed = search_with_observer(DEFAULT_BASE, 3, &mut silent).unwrap();
        assert_eq!(observed.nonce, search(DEFAULT_BASE, 3).unwrap().nonce);
    }

    #[test]
    fn test_tampered_result_fails_verification() {
        let mut result = search(DEFAULT_BASE, 2).unwrap();
        result.message.push('x');
        assert!(!result.verify());
    }
}
