//! Shopping cart module.
//!
//! Contains the persisted cart line types, configuration matching, the
//! optimistic reconciler and the quantity guard.

mod line;
mod matcher;
mod quantity;
mod reconciler;
mod transaction;
mod view;

pub use line::{
    CartDimension, CartLine, CartLineVariant, CART_DIMENSIONS_TABLE, CART_TABLE,
    CART_VARIANTS_TABLE,
};
pub use matcher::{catalog_ids, same_configuration};
pub use quantity::{
    clamp_quantity, quantity_in_bounds, QuantityField, MAX_QUANTITY, MAX_QUANTITY_MESSAGE,
    MIN_QUANTITY,
};
pub use reconciler::{AddOutcome, CartReconciler, OpPhase, ProductContext};
pub use transaction::Transaction;
pub use view::{CartLineView, CartView};
