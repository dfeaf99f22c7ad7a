//! Quantity bounds and the free-text quantity field.
//!
//! Two input surfaces drive quantity everywhere cart rows are shown: a ±1
//! stepper and a free-text field. Both agree on the same committed bounds;
//! the text field additionally tolerates a transient out-of-bounds value
//! while it has focus, so the engine does not fight the user's keystrokes.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Minimum committed quantity per cart line.
pub const MIN_QUANTITY: i64 = 1;
/// Maximum committed quantity per cart line.
pub const MAX_QUANTITY: i64 = 100;
/// Validation message shown while the draft is out of bounds.
pub const MAX_QUANTITY_MESSAGE: &str = "Maximum quantity is 100";

/// Clamp a quantity to the committed bounds.
pub fn clamp_quantity(quantity: i64) -> i64 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// Check a quantity against the committed bounds.
pub fn quantity_in_bounds(quantity: i64) -> bool {
    (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity)
}

/// State of one quantity input.
///
/// `confirmed` is the last value persistence acknowledged; `draft` exists
/// only while the field has focus. The commit flow is:
///
/// 1. [`QuantityField::commit`] parses and clamps the draft, returning the
///    candidate to persist.
/// 2. On success the caller calls [`QuantityField::confirm`]; on failure,
///    [`QuantityField::revert`], which falls back to the confirmed value.
///
/// Stepper clicks go through [`QuantityField::step_up`]/[`step_down`],
/// which clamp silently and skip the draft state entirely.
///
/// [`step_down`]: QuantityField::step_down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityField {
    confirmed: i64,
    draft: Option<String>,
}

impl QuantityField {
    /// Create a field at a confirmed quantity (clamped).
    pub fn new(quantity: i64) -> Self {
        Self {
            confirmed: clamp_quantity(quantity),
            draft: None,
        }
    }

    /// The last persisted quantity.
    pub fn confirmed(&self) -> i64 {
        self.confirmed
    }

    /// Whether the field currently holds an uncommitted draft.
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Focus the field, starting a draft at the confirmed value.
    pub fn begin_edit(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(self.confirmed.to_string());
        }
    }

    /// Record a keystroke's worth of raw text. Out-of-bounds and
    /// unparseable values are tolerated until commit.
    pub fn input(&mut self, raw: impl Into<String>) {
        self.draft = Some(raw.into());
    }

    /// The draft parsed as a quantity, if it parses at all.
    pub fn draft_value(&self) -> Option<i64> {
        self.draft.as_deref().and_then(|s| s.trim().parse().ok())
    }

    /// The validation message to show, if the draft is out of bounds or
    /// unparseable.
    pub fn validation_message(&self) -> Option<&'static str> {
        if !self.is_editing() {
            return None;
        }
        match self.draft_value() {
            Some(q) if quantity_in_bounds(q) => None,
            _ => Some(MAX_QUANTITY_MESSAGE),
        }
    }

    /// The line total to display, from the last known unit price.
    ///
    /// Suppressed (`None`) while the draft is invalid; the validation
    /// message takes its place.
    pub fn line_total(&self, unit_price: Money) -> Option<Money> {
        if self.validation_message().is_some() {
            return None;
        }
        let quantity = match self.draft_value() {
            Some(q) if self.is_editing() => q,
            _ => self.confirmed,
        };
        unit_price.try_multiply(quantity)
    }

    /// Commit the draft (blur or Enter): parse, clamp, clear the draft and
    /// the validation message. Returns the quantity to persist; an
    /// unparseable draft falls back to the confirmed value.
    pub fn commit(&mut self) -> i64 {
        let candidate = self.draft_value().unwrap_or(self.confirmed);
        self.draft = None;
        clamp_quantity(candidate)
    }

    /// Persistence acknowledged `quantity`; it becomes the confirmed value.
    pub fn confirm(&mut self, quantity: i64) {
        self.confirmed = clamp_quantity(quantity);
        self.draft = None;
    }

    /// Persistence failed; field and total fall back to the last confirmed
    /// value.
    pub fn revert(&mut self) {
        self.draft = None;
    }

    /// Whether the decrement button is enabled.
    pub fn can_step_down(&self) -> bool {
        self.confirmed > MIN_QUANTITY
    }

    /// +1, clamped silently. Returns the candidate to persist, or `None`
    /// when already at the maximum.
    pub fn step_up(&self) -> Option<i64> {
        let next = clamp_quantity(self.confirmed + 1);
        (next != self.confirmed).then_some(next)
    }

    /// −1, clamped silently. Returns the candidate to persist, or `None`
    /// when already at the minimum.
    pub fn step_down(&self) -> Option<i64> {
        let next = clamp_quantity(self.confirmed - 1);
        (next != self.confirmed).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(101), 100);
        assert_eq!(clamp_quantity(50), 50);
    }

    #[test]
    fn test_stepper_clamps_silently() {
        let field = QuantityField::new(100);
        assert_eq!(field.step_up(), None);

        let field = QuantityField::new(1);
        assert_eq!(field.step_down(), None);
        assert!(!field.can_step_down());

        let field = QuantityField::new(4);
        assert_eq!(field.step_up(), Some(5));
        assert_eq!(field.step_down(), Some(3));
    }

    #[test]
    fn test_transient_out_of_bounds_shows_message_and_suppresses_total() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("250");

        assert_eq!(field.validation_message(), Some(MAX_QUANTITY_MESSAGE));
        assert_eq!(field.line_total(Money::new(1000, Currency::USD)), None);
        // The confirmed value is untouched while typing.
        assert_eq!(field.confirmed(), 4);
    }

    #[test]
    fn test_commit_clamps_and_clears_message() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("250");

        assert_eq!(field.commit(), 100);
        assert_eq!(field.validation_message(), None);
        assert!(!field.is_editing());
    }

    #[test]
    fn test_commit_unparseable_falls_back_to_confirmed() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("abc");
        assert_eq!(field.validation_message(), Some(MAX_QUANTITY_MESSAGE));
        assert_eq!(field.commit(), 4);
    }

    #[test]
    fn test_confirm_after_persist() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("7");
        let candidate = field.commit();
        field.confirm(candidate);
        assert_eq!(field.confirmed(), 7);
    }

    #[test]
    fn test_revert_on_persist_failure() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("7");
        let _candidate = field.commit();
        field.revert();
        assert_eq!(field.confirmed(), 4);
        assert_eq!(
            field.line_total(Money::new(1000, Currency::USD)),
            Some(Money::new(4000, Currency::USD))
        );
    }

    #[test]
    fn test_valid_draft_shows_live_total() {
        let mut field = QuantityField::new(4);
        field.begin_edit();
        field.input("6");
        assert_eq!(
            field.line_total(Money::new(1000, Currency::USD)),
            Some(Money::new(6000, Currency::USD))
        );
    }
}
