//! shelfdb - a typed key-value store mapped onto a flat SQLite row table
//!
//! Scalars occupy one row; slices are split across a header row and one row
//! per element. See the `store` module for the encoding and locking rules.

pub mod cli;
pub mod http_server;
pub mod store;
pub mod value;
