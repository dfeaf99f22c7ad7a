//! The row store contract.

use crate::{Filter, Row, StoreError};
use async_trait::async_trait;

/// An opaque row-oriented persistence service.
///
/// Implementations are free to back this with SQL, an RPC service or an
/// in-memory map; the engine only ever sees rows in and rows (or errors) out.
/// All calls are suspension points; no ordering is guaranteed between
/// concurrent calls.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch every row of `table` matching `filter`.
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError>;

    /// Insert a row, returning the stored row.
    ///
    /// The store assigns the table's primary key when the inserted row does
    /// not carry one; the returned row always does.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Apply `patch` columns to every row matching `filter`.
    ///
    /// Returns the number of rows affected; zero means nothing matched.
    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError>;

    /// Delete every row matching `filter`, returning the number removed.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError>;
}
