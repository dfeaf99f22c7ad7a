//! Pure price computation.
//!
//! Every function here is referentially transparent: no I/O, no hidden
//! state. The same inputs always produce the same price, independent of
//! call order or prior calls.

use crate::catalog::ResolvedSpec;
use crate::error::CommerceError;
use crate::money::Money;
use crate::selection::SelectionState;
use serde::{Deserialize, Serialize};

/// Chosen continuous dimensions, in the catalog's unit (metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

/// Size-adjusted base price.
///
/// Without a spec this is the base price unchanged. With a spec, each axis
/// contributes `floor((value - min) / increment)` billable steps (never
/// negative), all priced at the primary spec's per-increment price; a base
/// spec, when present, adds its own steps on top.
pub fn size_price(
    base: Money,
    dims: Dimensions,
    spec: Option<&ResolvedSpec>,
) -> Result<Money, CommerceError> {
    let Some(spec) = spec else {
        return Ok(base);
    };

    let mut steps = spec.primary.length.steps(dims.length) + spec.primary.width.steps(dims.width);
    if let Some(base_spec) = &spec.base {
        steps += base_spec.length.steps(dims.length) + base_spec.width.steps(dims.width);
    }

    let surcharge = spec
        .primary
        .price_per_increment
        .try_multiply(steps)
        .ok_or(CommerceError::Overflow)?;
    base.try_add(&surcharge).ok_or(CommerceError::Overflow)
}

/// Unit price: size-adjusted base plus the surcharge of every selected
/// variant value. A group with no selection contributes nothing.
pub fn unit_price(
    base: Money,
    dims: Dimensions,
    spec: Option<&ResolvedSpec>,
    selection: &SelectionState,
) -> Result<Money, CommerceError> {
    let size = size_price(base, dims, spec)?;
    let surcharges = selection
        .surcharge_total(base.currency)
        .ok_or(CommerceError::Overflow)?;
    size.try_add(&surcharges).ok_or(CommerceError::Overflow)
}

/// Line total for a quantity of one configuration.
pub fn total_price(unit: Money, quantity: i64) -> Result<Money, CommerceError> {
    unit.try_multiply(quantity).ok_or(CommerceError::Overflow)
}
