//! Pow-Signer CLI Application
//!
//! Runs the proof-of-work search or the full sign/verify flow.

use clap::{Parser, Subcommand};
use pow_signer::cli::{self, PowArgs, SignArgs};
use pow_signer::mining::DEFAULT_PROGRESS_INTERVAL_SECS;
use pow_signer::{DEFAULT_BASE, DEFAULT_DIFFICULTY, DEFAULT_KEY_BITS};

#[derive(Parser)]
#[command(name = "pow-signer")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Proof-of-work search and RSA sign/verify", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a hash with leading zeros
    Pow {
        /// String the nonce is appended to
        #[arg(short, long, default_value = DEFAULT_BASE)]
        base: String,

        /// Number of leading zero hex characters
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,

        /// Seconds between progress lines
        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL_SECS)]
        progress_secs: u64,

        /// Give up after this many attempts
        #[arg(long)]
        max_attempts: Option<u128>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate keys, mine a message, sign and verify it
    Sign {
        /// String the nonce is appended to
        #[arg(short, long, default_value = DEFAULT_BASE)]
        base: String,

        /// Number of leading zero hex characters
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,

        /// RSA key size in bits
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,

        /// Seconds between progress lines
        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL_SECS)]
        progress_secs: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pow {
            base,
            difficulty,
            progress_secs,
            max_attempts,
            json,
        } => {
            cli::cmd_pow(&PowArgs {
                base,
                difficulty,
                progress_secs,
                max_attempts,
                json,
            })?;
        }

        Commands::Sign {
            base,
            difficulty,
            bits,
            progress_secs,
            json,
        } => {
            cli::cmd_sign(&SignArgs {
                base,
                difficulty,
                bits,
                progress_secs,
                json,
            })?;
        }
    }

    Ok(())
}
