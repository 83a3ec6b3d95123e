//! In-memory row store
//!
//! A BTreeMap-backed implementation of the row-store contract. Used by unit
//! and integration tests to exercise the store without SQLite, and to verify
//! through its mutation counters that the diff really issues minimal writes.

use std::collections::BTreeMap;

use super::errors::RowStoreError;
use super::row::{Row, RowStore};

/// Counts of the mutating calls a `MemoryRowStore` has served
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpCounters {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// Row store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: BTreeMap<String, Row>,
    counters: OpCounters,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation counts since construction
    pub fn counters(&self) -> OpCounters {
        self.counters
    }
}

impl RowStore for MemoryRowStore {
    fn create_row(&mut self, row: &Row) -> Result<(), RowStoreError> {
        self.counters.creates += 1;
        if self.rows.contains_key(&row.key) {
            return Err(RowStoreError::message(format!(
                "duplicate key {:?}",
                row.key
            )));
        }
        self.rows.insert(row.key.clone(), row.clone());
        Ok(())
    }

    fn find_row(&self, key: &str) -> Result<Option<Row>, RowStoreError> {
        Ok(self.rows.get(key).cloned())
    }

    fn update_row(&mut self, key: &str, row: &Row) -> Result<(), RowStoreError> {
        self.counters.updates += 1;
        match self.rows.get_mut(key) {
            Some(stored) => {
                *stored = row.clone();
                Ok(())
            }
            // stricter than SQL UPDATE's silent zero-row match; a store bug
            // that updates a missing row should fail a test, not pass one
            None => Err(RowStoreError::message(format!("no row at {:?}", key))),
        }
    }

    fn delete_row(&mut self, key: &str) -> Result<(), RowStoreError> {
        self.counters.deletes += 1;
        self.rows.remove(key);
        Ok(())
    }

    fn scan_rows(&self) -> Result<Vec<Row>, RowStoreError> {
        Ok(self.rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str) -> Row {
        Row {
            key: key.into(),
            kind: 1,
            value_int: Some(0),
            value_string: None,
            value_float: None,
        }
    }

    #[test]
    fn create_rejects_duplicates() {
        let mut store = MemoryRowStore::new();
        store.create_row(&row("k")).unwrap();
        assert!(store.create_row(&row("k")).is_err());
    }

    #[test]
    fn update_requires_existing_row() {
        let mut store = MemoryRowStore::new();
        assert!(store.update_row("k", &row("k")).is_err());
    }

    #[test]
    fn delete_missing_is_ok() {
        let mut store = MemoryRowStore::new();
        store.delete_row("k").unwrap();
    }

    #[test]
    fn counters_track_mutations() {
        let mut store = MemoryRowStore::new();
        store.create_row(&row("a")).unwrap();
        store.update_row("a", &row("a")).unwrap();
        store.delete_row("a").unwrap();
        assert_eq!(
            store.counters(),
            OpCounters {
                creates: 1,
                updates: 1,
                deletes: 1,
            }
        );
    }
}
