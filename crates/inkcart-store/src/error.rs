//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the persisted store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the request.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// No row matched when one was required.
    #[error("No rows matched")]
    NotFound,

    /// A row could not be decoded into the requested type.
    #[error("Row decode failed: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
