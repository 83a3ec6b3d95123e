//! # Store Errors
//!
//! Error types for the storage core.

use thiserror::Error;

use crate::value::ValueError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend-agnostic wrapper around a row-store engine failure.
///
/// Keeps `rusqlite` (or whatever engine backs the trait) out of the
/// `RowStore` signature.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RowStoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RowStoreError {
    /// Wrap an engine error with context
    pub fn new(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// A failure with no underlying engine error
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

/// Errors surfaced by the storage core.
///
/// Absence of a key is never an error; lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Logical keys may not contain `[` or `]`; those characters are
    /// reserved for element keys
    #[error("key {key:?} contains a reserved bracket character")]
    InvalidKey { key: String },

    /// Kind/payload mismatch or empty slice from the value model
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A row whose declared kind requires a column that is NULL
    #[error("corrupt row at {key:?}: {detail}")]
    CorruptRow { key: String, detail: String },

    /// A slice header that disagrees with its reachable element rows
    #[error("corrupt slice at {key:?}: {detail}")]
    CorruptSlice { key: String, detail: String },

    /// The reader/writer lock was poisoned by a panicking holder
    #[error("row store lock poisoned")]
    LockPoisoned,

    /// Any failure reported by the underlying row-store engine
    #[error("row store failure during {context}")]
    RowStore {
        context: &'static str,
        #[source]
        source: RowStoreError,
    },
}

impl StoreError {
    /// Wrap a backend failure with the operation it interrupted
    pub fn row_store(context: &'static str, source: RowStoreError) -> Self {
        StoreError::RowStore { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_errors_stay_distinguishable() {
        let err = StoreError::from(ValueError::EmptySlice);
        assert!(matches!(err, StoreError::Value(ValueError::EmptySlice)));
    }

    #[test]
    fn row_store_error_carries_context() {
        let err = StoreError::row_store("create", RowStoreError::message("disk full"));
        assert!(err.to_string().contains("create"));
    }
}
