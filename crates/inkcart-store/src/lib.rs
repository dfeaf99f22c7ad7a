//! Row-oriented persistence contract for the inkcart engine.
//!
//! The persisted store is treated as an opaque external collaborator: every
//! entity is a named table exposing `select`, `insert`, `update` and `delete`
//! over equality filters. Any transactional or RPC-capable backend can
//! implement [`RowStore`]; the crate ships [`MemStore`], an in-memory
//! implementation used by tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use inkcart_store::{Filter, MemStore, RowStore, row};
//!
//! let store = MemStore::new().with_table("cart", "cart_id");
//! let inserted = store.insert("cart", row! { "user_id" => 7, "quantity" => 2 }).await?;
//! let mine = store.select("cart", &Filter::new().eq("user_id", 7)).await?;
//! ```

mod error;
mod filter;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use filter::Filter;
pub use memory::MemStore;
pub use store::RowStore;
pub use types::{Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{row, Filter, MemStore, Row, RowStore, StoreError, Value};
}

/// Build a [`Row`] from `column => value` pairs.
///
/// # Example
///
/// ```rust,ignore
/// let row = row! { "user_id" => 7, "slug" => "vinyl-banner" };
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::default()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::default();
        $(row.set($column, $crate::Value::from($value));)+
        row
    }};
}
