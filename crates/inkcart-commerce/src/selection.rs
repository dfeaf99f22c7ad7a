//! Per-product selection state.
//!
//! Holds the chosen value per variant group, the current continuous
//! dimensions and the quantity. Initialized from catalog defaults when a
//! product page loads, discarded on navigation, and rehydrated from the
//! persisted cart line when the user edits an existing line.

use crate::cart::{clamp_quantity, CartDimension};
use crate::catalog::{ResolvedSpec, VariantGroup, VariantValue};
use crate::ids::{VariantGroupId, VariantValueId};
use crate::money::{Currency, Money};
use crate::pricing::Dimensions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry of a configuration.
///
/// Catalog variants and custom dimensions are separate arms by
/// construction, so configuration matching can only ever see catalog-backed
/// IDs; a custom size can never leak into the matched ID set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectedEntry {
    /// A catalog-backed variant value.
    CatalogVariant {
        id: VariantValueId,
        price_delta: Money,
    },
    /// Free-form continuous dimensions for products without a catalog size
    /// group.
    CustomDimension { length: f64, width: f64 },
}

/// The user's current configuration of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    choices: BTreeMap<VariantGroupId, VariantValue>,
    dims: Dimensions,
    quantity: i64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    /// Empty selection at quantity 1.
    pub fn new() -> Self {
        Self {
            choices: BTreeMap::new(),
            dims: Dimensions::default(),
            quantity: 1,
        }
    }

    /// Initialize from the groups' explicit defaults. Groups without a
    /// default start unselected.
    pub fn from_defaults(groups: &[VariantGroup]) -> Self {
        let mut state = Self::new();
        for group in groups {
            if let Some(default) = group.default_value() {
                state.choices.insert(group.id, default.clone());
            }
        }
        state
    }

    /// Restore an in-progress cart edit from its persisted variants and
    /// dimension row. IDs that no longer exist in the catalog are dropped.
    pub fn rehydrate(
        groups: &[VariantGroup],
        variant_ids: &[VariantValueId],
        dimension: Option<&CartDimension>,
        quantity: i64,
    ) -> Self {
        let mut state = Self::new();
        for &id in variant_ids {
            for group in groups {
                if let Some(value) = group.value(id) {
                    state.choices.insert(group.id, value.clone());
                    break;
                }
            }
        }
        if let Some(dim) = dimension {
            state.dims = Dimensions::new(dim.length, dim.width);
        }
        state.quantity = clamp_quantity(quantity);
        state
    }

    /// Select a value for a group, replacing any previous choice.
    pub fn select(&mut self, group: VariantGroupId, value: VariantValue) {
        self.choices.insert(group, value);
    }

    /// Clear a group's choice, returning whether one existed.
    pub fn clear(&mut self, group: VariantGroupId) -> bool {
        self.choices.remove(&group).is_some()
    }

    /// The chosen value for a group.
    pub fn selected(&self, group: VariantGroupId) -> Option<&VariantValue> {
        self.choices.get(&group)
    }

    /// Iterate over `(group, value)` choices.
    pub fn choices(&self) -> impl Iterator<Item = (VariantGroupId, &VariantValue)> {
        self.choices.iter().map(|(g, v)| (*g, v))
    }

    /// Set dimensions, clamped against the primary spec when one applies.
    pub fn set_dimensions(&mut self, dims: Dimensions, spec: Option<&ResolvedSpec>) {
        self.dims = match spec {
            Some(spec) => Dimensions::new(
                spec.primary.length.clamp(dims.length),
                spec.primary.width.clamp(dims.width),
            ),
            None => dims,
        };
    }

    /// Current dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Set the quantity, clamped to the committed bounds.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = clamp_quantity(quantity);
    }

    /// Current quantity. Always within bounds.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Sum of surcharges across every selected value.
    pub fn surcharge_total(&self, currency: Currency) -> Option<Money> {
        Money::try_sum(self.choices.values().map(|v| &v.price_delta), currency)
    }

    /// The catalog-backed IDs of this configuration.
    pub fn catalog_ids(&self) -> BTreeSet<VariantValueId> {
        self.choices.values().map(|v| v.id).collect()
    }

    /// The full configuration as entries. The custom-dimension entry is
    /// present exactly when the product has continuous sizing.
    pub fn entries(&self, spec: Option<&ResolvedSpec>) -> Vec<SelectedEntry> {
        let mut entries: Vec<SelectedEntry> = self
            .choices
            .values()
            .map(|v| SelectedEntry::CatalogVariant {
                id: v.id,
                price_delta: v.price_delta,
            })
            .collect();
        if spec.is_some() {
            entries.push(SelectedEntry::CustomDimension {
                length: self.dims.length,
                width: self.dims.width,
            });
        }
        entries
    }
}
