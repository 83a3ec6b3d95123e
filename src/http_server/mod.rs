//! # HTTP Server
//!
//! Thin JSON surface over the store. All validation and locking live in the
//! storage core; these handlers only translate between the wire envelope
//! and store calls.

mod config;
mod server;
mod store_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use store_routes::{store_routes, ApiState};
