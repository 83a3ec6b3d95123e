//! CLI module for shelfdb
//!
//! Provides command-line interface for:
//! - serve: run the HTTP server over a database file
//! - get/set/delete: one-shot operations against a database file
//! - list: dump every logical key and value

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run_command;
pub use errors::{CliError, CliResult};

use tracing_subscriber::EnvFilter;

/// Parse arguments, initialize logging, dispatch
pub fn run() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    run_command(Cli::parse_args())
}
