//! CLI commands
//!
//! Each handler runs one flow and prints a human-readable summary,
//! or a JSON document when `json` is set.

use crate::mining::{Miner, MinerConfig, ProgressObserver, SearchProgress};
use crate::signing::{SignatureConfig, SignatureEngine};
use chrono::{DateTime, Local};
use serde_json::json;
use std::time::Duration;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Arguments for the `pow` command
#[derive(Debug, Clone)]
pub struct PowArgs {
    pub base: String,
    pub difficulty: usize,
    pub progress_secs: u64,
    pub max_attempts: Option<u128>,
    pub json: bool,
}

/// Arguments for the `sign` command
#[derive(Debug, Clone)]
pub struct SignArgs {
    pub base: String,
    pub difficulty: usize,
    pub bits: usize,
    pub progress_secs: u64,
    pub json: bool,
}

/// Prints a line with the local time on every progress tick
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&mut self, progress: &SearchProgress) {
        println!(
            "   ⏳ Still searching... {} (nonce {}, {:.0} H/s)",
            format_timestamp(&progress.timestamp),
            progress.nonce,
            progress.hash_rate()
        );
    }
}

/// Local time as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Search for a qualifying nonce
pub fn cmd_pow(args: &PowArgs) -> CliResult<()> {
    let config = MinerConfig {
        difficulty: args.difficulty,
        progress_interval: Duration::from_secs(args.progress_secs),
        max_attempts: args.max_attempts,
    };
    let miner = Miner::new(&args.base, config)?;

    if args.json {
        let result = miner.mine()?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "⛏️  Searching for a hash with {} leading zeros (base: {:?})",
        args.difficulty, args.base
    );

    let result = miner.mine_with_observer(&mut ConsoleProgress)?;

    println!("\n✅ Found a hash with {} leading zeros!", result.difficulty);
    println!("   ├─ Time: {:.3}s", result.elapsed.as_secs_f64());
    println!("   ├─ Message: {}", result.message);
    println!("   ├─ Hash: {}", result.digest);
    println!("   ├─ Nonce: {}", result.nonce);
    println!("   └─ Hash rate: {:.2} H/s", result.hash_rate());

    Ok(())
}

/// Generate keys, mine a message, sign it and verify the signature
pub fn cmd_sign(args: &SignArgs) -> CliResult<()> {
    let engine = SignatureEngine::new(SignatureConfig {
        base: args.base.clone(),
        difficulty: args.difficulty,
        key_bits: args.bits,
        progress_interval: Duration::from_secs(args.progress_secs),
    });

    if args.json {
        let proof = engine.run()?;
        let summary = json!({
            "pow": proof.pow,
            "public_key_fingerprint": proof.fingerprint(),
            "signature": proof.signature.to_hex(),
            "verified": proof.verified,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("🔑 Generating {}-bit key pair and mining {:?}...", args.bits, args.base);
    println!("   Difficulty: {}", args.difficulty);

    let proof = engine.run_with_observer(&mut ConsoleProgress)?;

    println!("\n✅ Proof of work complete!");
    println!("   ├─ Message: {}", proof.pow.message);
    println!("   ├─ Hash: {}", proof.pow.digest);
    println!("   └─ Nonce: {}", proof.pow.nonce);

    println!("\n✍️  Signature ({} bytes):", proof.signature.len());
    println!("   {}", proof.signature.to_hex());
    println!("   Public key fingerprint: {}", proof.fingerprint());

    if proof.verified {
        println!("\n✅ Signature is valid");
    } else {
        println!("\n❌ Signature is invalid");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(&timestamp), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_cmd_pow_rejects_bad_difficulty() {
        let args = PowArgs {
            base: "sinycat".to_string(),
            difficulty: 65,
            progress_secs: 10,
            max_attempts: None,
            json: false,
        };
        assert!(cmd_pow(&args).is_err());
    }

    #[test]
    fn test_cmd_pow_budget_exhausted() {
        let args = PowArgs {
            base: "sinycat".to_string(),
            difficulty: 10,
            progress_secs: 10,
            max_attempts: Some(10),
            json: true,
        };
        assert!(cmd_pow(&args).is_err());
    }

    #[test]
    fn test_cmd_pow_succeeds() {
        let args = PowArgs {
            base: "sinycat".to_string(),
            difficulty: 1,
            progress_secs: 10,
            max_attempts: None,
            json: false,
        };
        assert!(cmd_pow(&args).is_ok());
    }
}
