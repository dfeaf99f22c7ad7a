//! In-memory reference implementation of [`RowStore`].

use crate::{Filter, Row, RowStore, StoreError, Value};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct Table {
    /// Primary-key column, when registered. Keys are assigned on insert.
    pk: Option<String>,
    next_id: i64,
    rows: Vec<Row>,
}

/// An in-memory row store.
///
/// Tables are created on first use. Registering a table with
/// [`MemStore::with_table`] enables primary-key assignment: inserts that do
/// not carry the key column receive a monotonically increasing integer,
/// starting at 1, so tests can assert exact persisted rows.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `table` with `pk` as its auto-assigned primary-key column.
    pub fn with_table(self, table: impl Into<String>, pk: impl Into<String>) -> Self {
        {
            let mut tables = self.lock();
            tables.entry(table.into()).or_default().pk = Some(pk.into());
        }
        self
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.lock().get(table).map_or(0, |t| t.rows.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RowStore for MemStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        let tables = self.lock();
        Ok(tables.get(table).map_or_else(Vec::new, |t| {
            t.rows.iter().filter(|r| filter.matches(r)).cloned().collect()
        }))
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        let mut tables = self.lock();
        let table = tables.entry(table.to_string()).or_default();
        if let Some(pk) = &table.pk {
            let missing = row.get(pk).map_or(true, Value::is_null);
            if missing {
                table.next_id += 1;
                row.set(pk.clone(), Value::Integer(table.next_id));
            } else if let Some(id) = row.get(pk).and_then(Value::as_integer) {
                // Keep auto-assignment ahead of explicitly keyed inserts.
                table.next_id = table.next_id.max(id);
            }
        }
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };
        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|r| filter.matches(r)) {
            for (column, value) in patch.iter() {
                row.set(column, value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = table.rows.len();
        table.rows.retain(|r| !filter.matches(r));
        Ok((before - table.rows.len()) as u64)
    }
}
