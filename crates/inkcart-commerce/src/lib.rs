//! Customizable-product pricing and cart reconciliation engine.
//!
//! This crate is the core of a storefront for customizable printed goods.
//! It turns a product's variant catalog plus a user's selections and
//! optional continuous dimensions into a deterministic price, and
//! reconciles "add to cart" actions against already-persisted cart lines so
//! that equivalent configurations merge instead of duplicating:
//!
//! - **Catalog**: variant group normalization, role classification,
//!   continuous-size dimension specs
//! - **Pricing**: pure unit/total price computation
//! - **Selection**: per-group choices, dimensions, bounded quantity
//! - **Cart**: configuration matching, optimistic reconciliation with
//!   rollback, quantity guard
//!
//! # Example
//!
//! ```rust,ignore
//! use inkcart_commerce::prelude::*;
//!
//! let groups = catalog::normalize(&raw_rows, Currency::USD);
//! let mut selection = SelectionState::from_defaults(&groups);
//! selection.set_quantity(2);
//!
//! let unit = pricing::unit_price(base_price, selection.dimensions(), spec.as_ref(), &selection)?;
//!
//! let mut reconciler = CartReconciler::new(store, UserId::new(7), Currency::USD);
//! let outcome = reconciler.add_or_update(&mut view, &product, &selection).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod pricing;
pub mod selection;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        AxisSpec, CatalogService, DimensionSpec, InputKind, RawVariantRow, ResolvedSpec, RoleMap,
        VariantGroup, VariantRole, VariantValue,
    };

    // Pricing and selection
    pub use crate::pricing::{self, Dimensions};
    pub use crate::selection::{SelectedEntry, SelectionState};

    // Cart
    pub use crate::cart::{
        AddOutcome, CartDimension, CartLine, CartLineVariant, CartLineView, CartReconciler,
        CartView, OpPhase, ProductContext, QuantityField, Transaction, MAX_QUANTITY, MIN_QUANTITY,
    };
}
