//! # Value Errors
//!
//! Error types for the value model.

use thiserror::Error;

/// Result type for value-model operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors produced while constructing or decoding typed values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// Payload shape does not match the declared kind
    #[error("payload does not match kind {kind}: {detail}")]
    TypeMismatch { kind: &'static str, detail: String },

    /// Slice values must hold at least one element
    #[error("slice value is empty")]
    EmptySlice,

    /// A persisted kind code that no variant maps to
    #[error("unknown kind code {0}")]
    UnknownKind(i64),
}
