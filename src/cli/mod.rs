//! Command-line interface for blogforge.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
