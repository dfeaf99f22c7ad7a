//! Variant catalog normalization.

use crate::ids::{VariantGroupId, VariantValueId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw catalog row as fetched from `product_variant_values`.
///
/// One row per (group, value) pair; the same value may appear in multiple
/// rows when the catalog joins it against several presentation contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariantRow {
    pub variant_value_id: i64,
    /// Surcharge in currency units; non-finite values decode to zero.
    pub price: f64,
    /// 0/1 flag, SQLite-style.
    pub is_default: i64,
    pub value_name: String,
    pub group_id: i64,
    pub group_name: String,
    pub input_type: String,
}

/// How a variant group is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InputKind {
    Swatch,
    #[default]
    Button,
    Color,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Swatch => "swatch",
            InputKind::Button => "button",
            InputKind::Color => "color",
        }
    }

    /// Parse a catalog input type. Unknown strings fall back to `Button`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "swatch" => InputKind::Swatch,
            "color" => InputKind::Color,
            _ => InputKind::Button,
        }
    }
}

/// A single selectable option within a variant group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantValue {
    pub id: VariantValueId,
    pub name: String,
    /// Surcharge added to the unit price when this value is selected.
    pub price_delta: Money,
    /// Pre-selected at load time. A group carries 0 or 1 defaults.
    pub is_default: bool,
}

/// A named axis of customization with one or more selectable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub id: VariantGroupId,
    pub name: String,
    pub input: InputKind,
    pub values: Vec<VariantValue>,
}

impl VariantGroup {
    /// The explicitly marked default value, if any.
    ///
    /// When the catalog carries several defaults for one group, the first in
    /// fetch order wins; absence of a default means no pre-selection.
    pub fn default_value(&self) -> Option<&VariantValue> {
        self.values.iter().find(|v| v.is_default)
    }

    /// Look up a value by its catalog ID.
    pub fn value(&self, id: VariantValueId) -> Option<&VariantValue> {
        self.values.iter().find(|v| v.id == id)
    }
}

/// Normalize raw catalog rows into grouped, deduplicated variant groups.
///
/// Rows are grouped by `group_id` in fetch order; values are deduplicated by
/// `variant_value_id`. Groups with a blank name or no usable values are
/// discarded, so a partially corrupt catalog degrades to "no options in that
/// group" instead of failing the render.
pub fn normalize(rows: &[RawVariantRow], currency: Currency) -> Vec<VariantGroup> {
    let mut groups: Vec<VariantGroup> = Vec::new();
    let mut seen_values: HashSet<(i64, i64)> = HashSet::new();

    for row in rows {
        let group_name = row.group_name.trim();
        if group_name.is_empty() {
            continue;
        }
        if !seen_values.insert((row.group_id, row.variant_value_id)) {
            continue;
        }
        let value_name = row.value_name.trim();
        if value_name.is_empty() {
            continue;
        }

        let value = VariantValue {
            id: VariantValueId::new(row.variant_value_id),
            name: value_name.to_string(),
            price_delta: Money::from_decimal(row.price, currency),
            is_default: row.is_default != 0,
        };

        let group_id = VariantGroupId::new(row.group_id);
        match groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => group.values.push(value),
            None => groups.push(VariantGroup {
                id: group_id,
                name: group_name.to_string(),
                input: InputKind::from_str(&row.input_type),
                values: vec![value],
            }),
        }
    }

    groups.retain(|g| !g.values.is_empty());
    groups
}
