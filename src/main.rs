//! shelfdb CLI entry point
//!
//! Minimal by design: parse and dispatch via cli::run, print errors to
//! stderr, exit non-zero on failure. No subsystem setup happens here.

use shelfdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
