//! Proof-of-work search and progress reporting

pub mod miner;
pub mod progress;

pub use miner::{
    search, search_with_observer, verify_pow, Miner, MinerConfig, PowError, PowResult,
    DEFAULT_BASE, DEFAULT_DIFFICULTY, DEFAULT_PROGRESS_INTERVAL_SECS,
};
pub use progress::{NoProgress, ProgressObserver, SearchProgress};
