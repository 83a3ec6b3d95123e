//! Storage core for shelfdb
//!
//! Maps typed values onto a flat table of homogeneous rows. A scalar value
//! occupies one row at its logical key. A slice value of length N occupies
//! N + 1 rows: a header row at the logical key carrying the element count,
//! plus element rows at the synthetic keys `key[0] .. key[N-1]`. Logical
//! keys may never contain `[` or `]`, so element keys cannot collide with
//! them.
//!
//! Updates are diff-based: the desired row set is compared against the rows
//! already stored and only the changed rows are created, updated or deleted.
//! All row-store access goes through a single reader/writer lock; writers
//! hold the exclusive lock across their whole read-diff-apply sequence so a
//! concurrent reader can never observe a half-applied slice.

mod diff;
mod encode;
mod errors;
mod memory;
mod row;
mod sqlite;

pub use diff::{diff_rows, RowBatch};
pub use encode::{decode_scalar, encode_rows, header_len};
pub use errors::{RowStoreError, StoreError, StoreResult};
pub use memory::{MemoryRowStore, OpCounters};
pub use row::{element_key, is_element_key, Row, RowStore};
pub use sqlite::SqliteRowStore;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::value::{Kind, Value};

/// Typed key-value store over an injected row store.
///
/// Owns the backend handle behind one `RwLock`. There is no global instance;
/// construct once and pass the store explicitly to whoever needs it.
pub struct Store<S: RowStore> {
    rows: RwLock<S>,
}

/// The production store backed by SQLite
pub type SqliteStore = Store<SqliteRowStore>;

impl Store<SqliteRowStore> {
    /// Open (or create) the SQLite-backed store at the given file path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let backend = SqliteRowStore::open(path).map_err(|e| StoreError::row_store("open", e))?;
        Ok(Store::new(backend))
    }
}

impl<S: RowStore> Store<S> {
    /// Wrap an already-opened row store
    pub fn new(row_store: S) -> Self {
        Self {
            rows: RwLock::new(row_store),
        }
    }

    /// Fetch the value at a logical key.
    ///
    /// Absence is `Ok(None)`, never an error. The shared lock is held for
    /// the whole multi-row sequence, so a slice read cannot interleave with
    /// a concurrent write.
    pub fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let rows = self.read_guard()?;
        get_locked(&*rows, key)
    }

    /// Store a value at a logical key, creating or diff-updating rows.
    ///
    /// Keys containing `[` or `]` are rejected, as are empty slices. The
    /// exclusive lock covers reading the prior rows, computing the diff and
    /// applying the batch, so two writers on the same key always serialize
    /// against each other's complete update.
    pub fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        if is_element_key(key) {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
            });
        }
        value.validate()?;
        let desired = encode_rows(key, value)?;

        let mut rows = self.write_guard()?;
        let current = current_rows_locked(&*rows, key)?;
        let batch = diff_rows(&desired, &current);
        if batch.is_empty() {
            return Ok(());
        }
        debug!(
            key,
            creates = batch.creates.len(),
            updates = batch.updates.len(),
            deletes = batch.deletes.len(),
            "applying row batch"
        );
        apply_batch_locked(&mut *rows, &batch)
    }

    /// Remove the value at a logical key.
    ///
    /// If the key holds a slice, the element rows are removed along with the
    /// header so no orphaned rows remain. The cascade is best-effort: a
    /// header that no longer decodes as a valid slice header gets no element
    /// cleanup, but the logical row is still removed, so delete always works
    /// as the recovery path for a corrupt record. Deleting an absent key is
    /// a no-op.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        let mut rows = self.write_guard()?;
        let header = rows
            .find_row(key)
            .map_err(|e| StoreError::row_store("delete", e))?;
        if let Some(header) = header {
            if let Ok(Some(count)) = header_len(&header) {
                for i in 0..count {
                    rows.delete_row(&element_key(key, i))
                        .map_err(|e| StoreError::row_store("delete", e))?;
                }
            }
        }
        rows.delete_row(key)
            .map_err(|e| StoreError::row_store("delete", e))
    }

    /// Exact-key existence check.
    ///
    /// Only looks at the logical key; does not verify that a slice's element
    /// rows are intact.
    pub fn contains(&self, key: &str) -> StoreResult<bool> {
        let rows = self.read_guard()?;
        let row = rows
            .find_row(key)
            .map_err(|e| StoreError::row_store("contains", e))?;
        Ok(row.is_some())
    }

    /// Every logical key with its fully materialized value.
    ///
    /// Element rows are skipped; slice values are rebuilt through the same
    /// validated path as `get`, under the single shared lock acquisition.
    pub fn get_all(&self) -> StoreResult<BTreeMap<String, Value>> {
        let rows = self.read_guard()?;
        let all = rows
            .scan_rows()
            .map_err(|e| StoreError::row_store("get_all", e))?;
        let mut values = BTreeMap::new();
        for row in all {
            if is_element_key(&row.key) {
                continue;
            }
            let value = match header_len(&row)? {
                None => decode_scalar(&row)?,
                Some(_) => match get_locked(&*rows, &row.key)? {
                    Some(value) => value,
                    None => continue,
                },
            };
            values.insert(row.key, value);
        }
        Ok(values)
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, S>> {
        self.rows.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, S>> {
        self.rows.write().map_err(|_| StoreError::LockPoisoned)
    }
}

/// Get with the lock already held; shared by `get` and `get_all`.
fn get_locked<S: RowStore>(rows: &S, key: &str) -> StoreResult<Option<Value>> {
    let row = match rows
        .find_row(key)
        .map_err(|e| StoreError::row_store("get", e))?
    {
        Some(row) => row,
        None => return Ok(None),
    };

    let count = match header_len(&row)? {
        None => return Ok(Some(decode_scalar(&row)?)),
        Some(count) => count,
    };

    let kind = Kind::from_code(row.kind)?;
    let mut elements = Vec::with_capacity(count);
    for i in 0..count {
        let elem_key = element_key(key, i);
        let elem = rows
            .find_row(&elem_key)
            .map_err(|e| StoreError::row_store("get", e))?
            .ok_or_else(|| StoreError::CorruptSlice {
                key: key.to_owned(),
                detail: format!("header declares {} elements but {} is missing", count, elem_key),
            })?;
        elements.push(decode_scalar(&elem)?);
    }
    Ok(Some(collect_slice(key, kind, elements)?))
}

/// Assemble element scalars into the slice value the header declares.
fn collect_slice(key: &str, kind: Kind, elements: Vec<Value>) -> StoreResult<Value> {
    let mismatch = |i: usize, got: Kind| StoreError::CorruptSlice {
        key: key.to_owned(),
        detail: format!(
            "element {} has kind {} but header declares {}",
            i,
            got.name(),
            kind.name()
        ),
    };

    match kind {
        Kind::SliceInt => {
            let mut out = Vec::with_capacity(elements.len());
            for (i, v) in elements.into_iter().enumerate() {
                match v {
                    Value::Int(v) => out.push(v),
                    other => return Err(mismatch(i, other.kind())),
                }
            }
            Ok(Value::SliceInt(out))
        }
        Kind::SliceString => {
            let mut out = Vec::with_capacity(elements.len());
            for (i, v) in elements.into_iter().enumerate() {
                match v {
                    Value::String(v) => out.push(v),
                    other => return Err(mismatch(i, other.kind())),
                }
            }
            Ok(Value::SliceString(out))
        }
        Kind::SliceFloat => {
            let mut out = Vec::with_capacity(elements.len());
            for (i, v) in elements.into_iter().enumerate() {
                match v {
                    Value::Float(v) => out.push(v),
                    other => return Err(mismatch(i, other.kind())),
                }
            }
            Ok(Value::SliceFloat(out))
        }
        Kind::SliceBool => {
            let mut out = Vec::with_capacity(elements.len());
            for (i, v) in elements.into_iter().enumerate() {
                match v {
                    Value::Bool(v) => out.push(v),
                    other => return Err(mismatch(i, other.kind())),
                }
            }
            Ok(Value::SliceBool(out))
        }
        scalar => Err(StoreError::CorruptSlice {
            key: key.to_owned(),
            detail: format!("header kind {} is not a slice kind", scalar.name()),
        }),
    }
}

/// The rows currently stored for a logical key: empty if absent, the single
/// scalar row, or the header row followed by its element rows in order.
fn current_rows_locked<S: RowStore>(rows: &S, key: &str) -> StoreResult<Vec<Row>> {
    let header = match rows
        .find_row(key)
        .map_err(|e| StoreError::row_store("set", e))?
    {
        Some(row) => row,
        None => return Ok(Vec::new()),
    };

    let count = match header_len(&header)? {
        None => return Ok(vec![header]),
        Some(count) => count,
    };

    let mut current = Vec::with_capacity(count + 1);
    current.push(header);
    for i in 0..count {
        let elem_key = element_key(key, i);
        let elem = rows
            .find_row(&elem_key)
            .map_err(|e| StoreError::row_store("set", e))?
            .ok_or_else(|| StoreError::CorruptSlice {
                key: key.to_owned(),
                detail: format!("header declares {} elements but {} is missing", count, elem_key),
            })?;
        current.push(elem);
    }
    Ok(current)
}

/// Apply a diff batch with the exclusive lock held.
///
/// A backend failure aborts the remaining batch; rows already written stay
/// in place (there is no cross-row transaction), so callers must treat a
/// failed set as leaving the key in an indeterminate state.
fn apply_batch_locked<S: RowStore>(rows: &mut S, batch: &RowBatch) -> StoreResult<()> {
    for row in &batch.creates {
        rows.create_row(row)
            .map_err(|e| StoreError::row_store("create", e))?;
    }
    for row in &batch.updates {
        rows.update_row(&row.key, row)
            .map_err(|e| StoreError::row_store("update", e))?;
    }
    for key in &batch.deletes {
        rows.delete_row(key)
            .map_err(|e| StoreError::row_store("remove", e))?;
    }
    Ok(())
}
