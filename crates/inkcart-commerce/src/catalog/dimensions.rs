//! Continuous-size dimension specs.
//!
//! Products with custom sizing (banners, standees) carry per-axis
//! constraints in `size_dimension_customizable`: minimum, maximum and
//! increment, plus the price charged per increment step.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// The generic spec target.
pub const TARGET_DEFAULT: &str = "default";
/// Specialized target carried by products with a separate base part.
pub const TARGET_BASE: &str = "base";

/// Raw spec row as fetched from `size_dimension_customizable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSpecRow {
    pub product_id: i64,
    pub target: String,
    pub min_length: f64,
    pub max_length: f64,
    pub length_increment: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub width_increment: f64,
    /// Price per increment step, in currency units.
    pub price_per_increment: f64,
}

/// A continuous dimension axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Length,
    Width,
}

/// Min/max/increment constraints for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    /// Step size. Absent or non-positive means the axis is continuous: no
    /// rounding, min/max bounding only, and zero billable steps.
    pub increment: f64,
}

impl AxisSpec {
    fn has_increment(&self) -> bool {
        self.increment.is_finite() && self.increment > 0.0
    }

    /// Clamp `value` to the axis: round to the nearest increment multiple
    /// offset from the minimum, then bound to `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let stepped = if self.has_increment() {
            self.min + ((value - self.min) / self.increment).round() * self.increment
        } else {
            value
        };
        stepped.clamp(self.min, self.max)
    }

    /// Billable steps above the axis minimum. Never negative: values below
    /// the minimum contribute zero extra cost, not a negative price.
    pub fn steps(&self, value: f64) -> i64 {
        if !self.has_increment() || !value.is_finite() {
            return 0;
        }
        (((value - self.min) / self.increment).floor() as i64).max(0)
    }
}

/// Per-product continuous-size constraints used for size-based pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub target: String,
    pub length: AxisSpec,
    pub width: AxisSpec,
    pub price_per_increment: Money,
}

impl DimensionSpec {
    /// Decode a raw spec row.
    pub fn from_row(row: &DimensionSpecRow, currency: Currency) -> Self {
        Self {
            target: row.target.clone(),
            length: AxisSpec {
                min: row.min_length,
                max: row.max_length,
                increment: row.length_increment,
            },
            width: AxisSpec {
                min: row.min_width,
                max: row.max_width,
                increment: row.width_increment,
            },
            price_per_increment: Money::from_decimal(row.price_per_increment, currency),
        }
    }

    /// The spec for one axis.
    pub fn axis(&self, axis: Axis) -> &AxisSpec {
        match axis {
            Axis::Length => &self.length,
            Axis::Width => &self.width,
        }
    }

    /// Clamp a value on the given axis.
    pub fn clamp(&self, value: f64, axis: Axis) -> f64 {
        self.axis(axis).clamp(value)
    }
}

/// The specs that apply to one product: a primary spec and, for products
/// with a separate base part, the base spec billed on top of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpec {
    pub primary: DimensionSpec,
    pub base: Option<DimensionSpec>,
}

/// Pick the applicable specs from the 0..2 rows stored per product.
///
/// Primary precedence: the subtype's specialized target, else `"default"`,
/// else the first non-base row found. The `"base"` row, when present and not
/// itself the primary, rides along for base-step pricing.
pub fn resolve(specs: Vec<DimensionSpec>, subtype: Option<&str>) -> Option<ResolvedSpec> {
    if specs.is_empty() {
        return None;
    }

    let pick = |target: &str| specs.iter().position(|s| s.target.eq_ignore_ascii_case(target));
    let primary_idx = subtype
        .and_then(pick)
        .or_else(|| pick(TARGET_DEFAULT))
        .or_else(|| {
            specs
                .iter()
                .position(|s| !s.target.eq_ignore_ascii_case(TARGET_BASE))
        })
        .unwrap_or(0);

    let base = specs
        .iter()
        .enumerate()
        .find(|(i, s)| *i != primary_idx && s.target.eq_ignore_ascii_case(TARGET_BASE))
        .map(|(_, s)| s.clone());

    let primary = specs.into_iter().nth(primary_idx)?;
    Some(ResolvedSpec { primary, base })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(target: &str) -> DimensionSpec {
        DimensionSpec {
            target: target.to_string(),
            length: AxisSpec {
                min: 0.6,
                max: 3.0,
                increment: 0.1,
            },
            width: AxisSpec {
                min: 0.6,
                max: 1.5,
                increment: 0.1,
            },
            price_per_increment: Money::new(50, Currency::USD),
        }
    }

    #[test]
    fn test_clamp_rounds_to_nearest_increment() {
        let axis = AxisSpec {
            min: 0.6,
            max: 3.0,
            increment: 0.1,
        };
        assert!((axis.clamp(0.73) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_never_below_minimum() {
        let axis = AxisSpec {
            min: 0.6,
            max: 3.0,
            increment: 0.1,
        };
        assert!((axis.clamp(0.55) - 0.6).abs() < 1e-9);
        assert!((axis.clamp(-4.0) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_bounds_to_maximum() {
        let axis = AxisSpec {
            min: 0.6,
            max: 3.0,
            increment: 0.1,
        };
        assert!((axis.clamp(9.9) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_increment_bounds_only() {
        let axis = AxisSpec {
            min: 0.6,
            max: 3.0,
            increment: 0.0,
        };
        assert!((axis.clamp(0.73) - 0.73).abs() < 1e-9);
        assert!((axis.clamp(5.0) - 3.0).abs() < 1e-9);
        assert_eq!(axis.steps(2.0), 0);
    }

    #[test]
    fn test_steps_never_negative() {
        let axis = AxisSpec {
            min: 0.6,
            max: 3.0,
            increment: 0.1,
        };
        assert_eq!(axis.steps(0.3), 0);
        assert_eq!(axis.steps(0.6), 0);
        assert_eq!(axis.steps(0.9), 3);
    }

    #[test]
    fn test_resolve_prefers_subtype_target() {
        let resolved = resolve(vec![spec("default"), spec("standee")], Some("standee")).unwrap();
        assert_eq!(resolved.primary.target, "standee");
        assert!(resolved.base.is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let resolved = resolve(vec![spec("default"), spec("base")], Some("standee")).unwrap();
        assert_eq!(resolved.primary.target, "default");
        assert_eq!(resolved.base.as_ref().map(|s| s.target.as_str()), Some("base"));
    }

    #[test]
    fn test_resolve_falls_back_to_first_row() {
        let resolved = resolve(vec![spec("banner")], None).unwrap();
        assert_eq!(resolved.primary.target, "banner");
    }

    #[test]
    fn test_resolve_empty_is_none() {
        assert!(resolve(vec![], None).is_none());
    }

    #[test]
    fn test_base_only_product_uses_base_as_primary() {
        let resolved = resolve(vec![spec("base")], None).unwrap();
        assert_eq!(resolved.primary.target, "base");
        assert!(resolved.base.is_none());
    }
}
