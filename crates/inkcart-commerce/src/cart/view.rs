//! Local optimistic cart state.

use crate::cart::CartLine;
use crate::ids::{CartId, VariantValueId};
use crate::money::{Currency, Money};
use std::collections::BTreeSet;

/// One cart line as currently rendered, with its configuration identity and
/// the advisory in-flight flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub line: CartLine,
    /// Catalog-backed variant IDs attached to the line.
    pub variant_ids: BTreeSet<VariantValueId>,
    /// Set while a mutating operation is in flight for this line. While
    /// set, further mutations on the same line are refused. Advisory
    /// serialization only, not a server-side lock.
    pub busy: bool,
}

impl CartLineView {
    pub fn new(line: CartLine, variant_ids: BTreeSet<VariantValueId>) -> Self {
        Self {
            line,
            variant_ids,
            busy: false,
        }
    }
}

/// The cart as the UI shows it: a local optimistic copy of the persisted
/// lines, reconciled or rolled back around every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
}

impl CartView {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted lines, e.g. after a cart page load.
    pub fn from_lines(lines: Vec<CartLineView>) -> Self {
        Self { lines }
    }

    /// Find a line by cart ID.
    pub fn find(&self, cart_id: CartId) -> Option<&CartLineView> {
        self.lines.iter().find(|l| l.line.cart_id == cart_id)
    }

    /// Find a line by cart ID, mutably.
    pub fn find_mut(&mut self, cart_id: CartId) -> Option<&mut CartLineView> {
        self.lines.iter_mut().find(|l| l.line.cart_id == cart_id)
    }

    /// Remove a line, returning whether it was present.
    pub fn remove(&mut self, cart_id: CartId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line.cart_id != cart_id);
        self.lines.len() < before
    }

    /// Total item count across lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.line.quantity).sum()
    }

    /// Sum of line totals. `None` on overflow.
    pub fn subtotal(&self, currency: Currency) -> Option<Money> {
        Money::try_sum(self.lines.iter().map(|l| &l.line.total_price), currency)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
