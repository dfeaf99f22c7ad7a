//! Product catalog module.
//!
//! Contains variant group normalization, role classification and
//! continuous-size dimension specs, plus the cached loader over the store.

mod dimensions;
mod role;
mod service;
mod variant;

pub use dimensions::{
    resolve, Axis, AxisSpec, DimensionSpec, DimensionSpecRow, ResolvedSpec, TARGET_BASE,
    TARGET_DEFAULT,
};
pub use role::{assign_roles, RoleMap, VariantRole};
pub use service::{CatalogService, PRODUCT_VARIANT_VALUES_TABLE, SIZE_DIMENSIONS_TABLE};
pub use variant::{normalize, InputKind, RawVariantRow, VariantGroup, VariantValue};
