//! Diff between a desired row set and the rows already stored
//!
//! Pure function, no side effects: the store reads the current rows under
//! its exclusive lock, diffs them against the encoding of the new value and
//! applies only the resulting batch. Unchanged rows produce no writes at
//! all, a grown slice creates only its new tail, and a shrunk slice deletes
//! the trailing element rows its header no longer references.

use std::collections::HashMap;

use crate::value::Kind;

use super::row::Row;

/// The row-level operations needed to move stored state to a desired value.
///
/// Applied in order: creates, then updates, then deletes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowBatch {
    pub creates: Vec<Row>,
    pub updates: Vec<Row>,
    pub deletes: Vec<String>,
}

impl RowBatch {
    /// True when applying the batch would touch nothing
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Compute the minimal batch turning `current` into `desired`.
///
/// `current` is the full stored representation of the logical key (empty if
/// the key is absent, otherwise the scalar row or the header row followed by
/// its element rows). Rows are matched by key; matched rows are updated only
/// when their stored value differs semantically, and current rows with no
/// desired counterpart are deleted (the shrink cleanup).
pub fn diff_rows(desired: &[Row], current: &[Row]) -> RowBatch {
    let mut remaining: HashMap<&str, &Row> =
        current.iter().map(|row| (row.key.as_str(), row)).collect();

    let mut batch = RowBatch::default();
    for row in desired {
        match remaining.remove(row.key.as_str()) {
            None => batch.creates.push(row.clone()),
            Some(stored) => {
                if !rows_equivalent(row, stored) {
                    batch.updates.push(row.clone());
                }
            }
        }
    }
    // deletion order follows the stored order, so slice shrink removes the
    // trailing element rows in index order
    for row in current {
        if remaining.contains_key(row.key.as_str()) {
            batch.deletes.push(row.key.clone());
        }
    }
    batch
}

/// Semantic equality of two rows at the same key.
///
/// Bools compare after 0/1 decode so a non-canonical stored integer still
/// matches its boolean meaning only when it should. Rows whose kind code is
/// unknown never compare equal; rewriting them repairs the record.
fn rows_equivalent(a: &Row, b: &Row) -> bool {
    if a.kind != b.kind {
        return false;
    }
    let kind = match Kind::from_code(a.kind) {
        Ok(kind) => kind,
        Err(_) => return false,
    };
    match kind {
        Kind::Bool => match (a.value_int, b.value_int) {
            (Some(a), Some(b)) => (a != 0) == (b != 0),
            _ => false,
        },
        Kind::Int | Kind::SliceInt | Kind::SliceString | Kind::SliceFloat | Kind::SliceBool => {
            // slice headers carry their count in the integer column
            a.value_int.is_some() && a.value_int == b.value_int
        }
        Kind::String => a.value_string.is_some() && a.value_string == b.value_string,
        Kind::Float => a.value_float.is_some() && a.value_float == b.value_float,
    }
}
