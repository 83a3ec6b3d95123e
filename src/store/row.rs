//! Row model and the row-store contract
//!
//! The persisted table is flat and homogeneous: every row has a unique key,
//! a kind code and three nullable value columns of which exactly one is
//! populated (bool values and slice headers use the integer column).

use super::errors::RowStoreError;

/// One persisted record.
///
/// For scalar values the row sits at the logical key with its value in the
/// matching column. For a slice of length N the row at the logical key is a
/// header whose `value_int` holds N, and the elements sit at `key[0]` through
/// `key[N-1]` with the scalar element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Primary key, unique across the table
    pub key: String,
    /// Persisted kind code (`Kind::code`)
    pub kind: i64,
    /// Int and bool payloads, bool as 0/1; element count for slice headers
    pub value_int: Option<i64>,
    /// String payloads
    pub value_string: Option<String>,
    /// Float payloads
    pub value_float: Option<f64>,
}

/// The synthetic key of the i-th element row under a logical key
pub fn element_key(key: &str, index: usize) -> String {
    format!("{}[{}]", key, index)
}

/// True if the key contains a reserved bracket character.
///
/// Such keys are element rows (or illegal input); they are rejected on write
/// and skipped by whole-table enumeration.
pub fn is_element_key(key: &str) -> bool {
    key.contains('[') || key.contains(']')
}

/// The narrow contract required of the underlying SQL engine.
///
/// Implementations do not lock; the store serializes access above this
/// trait. `create_row` does not pre-check for duplicates, so creating an
/// existing key surfaces whatever constraint error the engine defines.
pub trait RowStore: Send + Sync {
    /// Insert a new row; duplicate keys are an engine-defined failure
    fn create_row(&mut self, row: &Row) -> Result<(), RowStoreError>;

    /// Fetch the row at an exact key; absence is `Ok(None)`
    fn find_row(&self, key: &str) -> Result<Option<Row>, RowStoreError>;

    /// Overwrite the columns of the row at `key`
    fn update_row(&mut self, key: &str, row: &Row) -> Result<(), RowStoreError>;

    /// Remove the row at `key`; removing an absent key is not an error
    fn delete_row(&mut self, key: &str) -> Result<(), RowStoreError>;

    /// Every row in the table, in unspecified order
    fn scan_rows(&self) -> Result<Vec<Row>, RowStoreError>;
}
