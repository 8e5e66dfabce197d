//! Command-line handlers

pub mod commands;

pub use commands::{cmd_pow, cmd_sign, CliResult, ConsoleProgress, PowArgs, SignArgs};
