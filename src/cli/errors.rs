//! # CLI Errors
//!
//! Error types for CLI command execution.

use thiserror::Error;

use crate::store::StoreError;
use crate::value::ValueError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the terminal
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("bad payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no value at key {0:?}")]
    NotFound(String),
}
