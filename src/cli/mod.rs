//! Command-line interface for adforge.
//!
//! Provides commands for scenario synthesis, answer generation, and
//! supervised / preference dataset packaging.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands};
