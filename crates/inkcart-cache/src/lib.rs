//! Injected TTL caching service for the inkcart engine.
//!
//! Catalog data (variant groups, dimension specs) changes rarely and is
//! fetched on every product render; the loader layer owns an explicit
//! [`TtlCache`] instance instead of reaching for ambient global state.
//! Values are JSON-serialized so any `Serialize`/`DeserializeOwned` type can
//! be cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use inkcart_cache::{cache_key, TtlCache};
//! use std::time::Duration;
//!
//! let cache = TtlCache::new();
//! let key = cache_key!("catalog", product_id);
//! cache.set(&key, &groups, Some(Duration::from_secs(300)))?;
//! let groups: Option<Vec<VariantGroup>> = cache.get(&key)?;
//! ```

mod error;
mod ttl;

pub use error::CacheError;
pub use ttl::TtlCache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, CacheError, TtlCache};
}

/// Build a namespaced cache key from a prefix and parts.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("catalog", product_id);
/// // "catalog:42"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+ $(,)?) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
