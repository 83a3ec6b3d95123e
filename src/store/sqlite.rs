//! SQLite row store
//!
//! Backs the row-store contract with a single SQLite file through an r2d2
//! connection pool. The table is created on open; there are no further
//! migrations. This module does no locking of its own and no slice logic;
//! it only moves rows.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

use super::errors::RowStoreError;
use super::row::{Row, RowStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv (
    key          TEXT PRIMARY KEY,
    value_kind   INTEGER NOT NULL,
    value_int    INTEGER,
    value_string TEXT,
    value_float  REAL
)";

/// Row store backed by a SQLite database file
pub struct SqliteRowStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteRowStore {
    /// Open the database at `path`, creating the file and table as needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RowStoreError> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| RowStoreError::new("build connection pool", e))?;
        {
            let conn = pool
                .get()
                .map_err(|e| RowStoreError::new("get connection", e))?;
            conn.pragma_update(None, "journal_mode", "wal")
                .map_err(|e| RowStoreError::new("set journal_mode", e))?;
            conn.execute_batch(CREATE_TABLE)
                .map_err(|e| RowStoreError::new("create kv table", e))?;
        }
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, RowStoreError> {
        self.pool
            .get()
            .map_err(|e| RowStoreError::new("get connection", e))
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    Ok(Row {
        key: row.get(0)?,
        kind: row.get(1)?,
        value_int: row.get(2)?,
        value_string: row.get(3)?,
        value_float: row.get(4)?,
    })
}

impl RowStore for SqliteRowStore {
    fn create_row(&mut self, row: &Row) -> Result<(), RowStoreError> {
        self.conn()?
            .execute(
                "INSERT INTO kv (key, value_kind, value_int, value_string, value_float)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.key,
                    row.kind,
                    row.value_int,
                    row.value_string,
                    row.value_float
                ],
            )
            .map_err(|e| RowStoreError::new("insert row", e))?;
        Ok(())
    }

    fn find_row(&self, key: &str) -> Result<Option<Row>, RowStoreError> {
        self.conn()?
            .query_row(
                "SELECT key, value_kind, value_int, value_string, value_float
                 FROM kv WHERE key = ?1",
                params![key],
                read_row,
            )
            .optional()
            .map_err(|e| RowStoreError::new("select row", e))
    }

    fn update_row(&mut self, key: &str, row: &Row) -> Result<(), RowStoreError> {
        self.conn()?
            .execute(
                "UPDATE kv SET value_kind = ?2, value_int = ?3, value_string = ?4,
                 value_float = ?5 WHERE key = ?1",
                params![
                    key,
                    row.kind,
                    row.value_int,
                    row.value_string,
                    row.value_float
                ],
            )
            .map_err(|e| RowStoreError::new("update row", e))?;
        Ok(())
    }

    fn delete_row(&mut self, key: &str) -> Result<(), RowStoreError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| RowStoreError::new("delete row", e))?;
        Ok(())
    }

    fn scan_rows(&self) -> Result<Vec<Row>, RowStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT key, value_kind, value_int, value_string, value_float FROM kv",
            )
            .map_err(|e| RowStoreError::new("prepare scan", e))?;
        let rows = stmt
            .query_map([], read_row)
            .map_err(|e| RowStoreError::new("scan rows", e))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| RowStoreError::new("scan rows", e))?);
        }
        Ok(out)
    }
}
