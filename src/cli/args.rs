//! CLI argument definitions using clap
//!
//! Commands:
//! - shelfdb serve --db <path> --port <port>
//! - shelfdb get --db <path> <key>
//! - shelfdb set --db <path> <key> --type <code> <data>
//! - shelfdb delete --db <path> <key>
//! - shelfdb list --db <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shelfdb - A typed key-value store mapped onto a flat SQLite row table
#[derive(Parser, Debug)]
#[command(name = "shelfdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the store over HTTP
    Serve {
        /// Path to the database file
        #[arg(long, default_value = "./shelf.db")]
        db: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8750)]
        port: u16,
    },

    /// Print the value at a key
    Get {
        /// Path to the database file
        #[arg(long, default_value = "./shelf.db")]
        db: PathBuf,

        /// Logical key
        key: String,
    },

    /// Store a value at a key
    Set {
        /// Path to the database file
        #[arg(long, default_value = "./shelf.db")]
        db: PathBuf,

        /// Logical key
        key: String,

        /// Kind code (1=int 2=string 3=float 4=bool, 5-8 the slices),
        /// matching the wire shape's "type" field
        #[arg(long = "type")]
        kind: i64,

        /// Payload as JSON, e.g. '5', '"text"' or '[1,2,3]'
        data: String,
    },

    /// Remove the value at a key
    Delete {
        /// Path to the database file
        #[arg(long, default_value = "./shelf.db")]
        db: PathBuf,

        /// Logical key
        key: String,
    },

    /// Print every logical key and value
    List {
        /// Path to the database file
        #[arg(long, default_value = "./shelf.db")]
        db: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_takes_the_kind_code_as_type() {
        let cli =
            Cli::try_parse_from(["shelfdb", "set", "answer", "--type", "1", "42"]).unwrap();
        match cli.command {
            Command::Set { key, kind, data, .. } => {
                assert_eq!(key, "answer");
                assert_eq!(kind, 1);
                assert_eq!(data, "42");
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn kind_is_not_a_recognized_flag() {
        assert!(Cli::try_parse_from(["shelfdb", "set", "answer", "--kind", "1", "42"]).is_err());
    }
}
