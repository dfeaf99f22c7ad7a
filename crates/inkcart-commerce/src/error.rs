//! Engine error types.
//!
//! Every failure is scoped to the single user action that raised it; nothing
//! here is fatal to the host process.

use crate::ids::CartId;
use inkcart_cache::CacheError;
use inkcart_store::StoreError;
use thiserror::Error;

/// Errors that can occur in pricing and cart operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity outside the committed bounds. Raised before any I/O.
    #[error("Invalid quantity {0}: must be between 1 and 100")]
    InvalidQuantity(i64),

    /// Missing or malformed identity/input. Raised before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The cart line no longer exists (e.g. deleted in another tab).
    /// Surfaced once; local state for the line is removed, never retried.
    #[error("Cart line not found: {0}")]
    LineNotFound(CartId),

    /// A mutating operation is already in flight for this line.
    #[error("Operation already in flight for cart line {0}")]
    OperationInFlight(CartId),

    /// An insert/update/delete failed. The optimistic local state has been
    /// rolled back to the pre-operation snapshot.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// A multi-step insert failed partway. Compensating deletes for the
    /// rows created by this operation have been issued.
    #[error("Partial failure persisting cart line {cart_id} at step {step}: {source}")]
    PartialFailure {
        cart_id: CartId,
        step: &'static str,
        #[source]
        source: StoreError,
    },

    /// Cache layer failure.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Arithmetic overflow in a price calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,
}
