//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to serialize or deserialize a cached value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
