//! Cart reconciliation against the persisted store.
//!
//! Every mutation follows the same shape: validate before any I/O, apply
//! the change to the local [`CartView`] optimistically, persist, then keep
//! the optimistic state on success or restore the pre-operation snapshot
//! verbatim on failure. Equivalent configurations merge into one line
//! instead of duplicating.

use crate::cart::matcher;
use crate::cart::quantity::{quantity_in_bounds, MAX_QUANTITY};
use crate::cart::transaction::Transaction;
use crate::cart::view::{CartLineView, CartView};
use crate::cart::{
    CartDimension, CartLine, CartLineVariant, CART_DIMENSIONS_TABLE, CART_TABLE,
    CART_VARIANTS_TABLE,
};
use crate::catalog::ResolvedSpec;
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId, UserId, VariantValueId};
use crate::money::{Currency, Money};
use crate::pricing::{self, Dimensions};
use crate::selection::{SelectedEntry, SelectionState};
use inkcart_store::{row, Filter, Row, RowStore, StoreError, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Phases of one reconciler operation.
///
/// `Committed` and `RolledBack` are the resting phases observable after an
/// operation finishes; the next operation starts a fresh `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpPhase {
    #[default]
    Idle,
    Submitting,
    Committed,
    Failed,
    RolledBack,
}

/// What an add ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// An existing line with the same configuration absorbed the add.
    Merged { cart_id: CartId, quantity: i64 },
    /// A new cart line was created.
    Inserted { cart_id: CartId },
}

/// Immutable facts about the product being configured, assembled by the
/// product page from the catalog.
#[derive(Debug, Clone)]
pub struct ProductContext {
    pub product_id: ProductId,
    pub base_price: Money,
    pub route: String,
    pub slug: String,
    pub spec: Option<ResolvedSpec>,
}

/// Orchestrates cart mutations for one user.
pub struct CartReconciler {
    store: Arc<dyn RowStore>,
    user_id: UserId,
    currency: Currency,
    phase: OpPhase,
}

impl CartReconciler {
    pub fn new(store: Arc<dyn RowStore>, user_id: UserId, currency: Currency) -> Self {
        Self {
            store,
            user_id,
            currency,
            phase: OpPhase::Idle,
        }
    }

    /// Phase of the most recent operation.
    pub fn phase(&self) -> OpPhase {
        self.phase
    }

    /// Add the current selection to the cart, merging into an existing line
    /// when the configuration already sits in the cart.
    pub async fn add_or_update(
        &mut self,
        view: &mut CartView,
        product: &ProductContext,
        selection: &SelectionState,
    ) -> Result<AddOutcome, CommerceError> {
        // Validation happens before any I/O.
        if !product.product_id.is_persisted() {
            return Err(CommerceError::Validation("missing product identity".into()));
        }
        if !self.user_id.is_persisted() {
            return Err(CommerceError::Validation("missing user identity".into()));
        }
        let quantity = selection.quantity();
        if !quantity_in_bounds(quantity) {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let spec = product.spec.as_ref();
        let dims = selection.dimensions();
        let unit = pricing::unit_price(product.base_price, dims, spec, selection)?;
        let total = pricing::total_price(unit, quantity)?;
        let size_surcharge = match spec {
            Some(spec) => Some(size_component(product.base_price, dims, spec)?),
            None => None,
        };
        let entries = selection.entries(spec);
        let ids = matcher::catalog_ids(&entries);

        // Refuse while the locally matching line has an operation in flight.
        if let Some(line) = view
            .lines
            .iter()
            .find(|l| self.is_local_match(l, product.product_id, &ids))
        {
            if line.busy {
                return Err(CommerceError::OperationInFlight(line.line.cart_id));
            }
        }

        self.phase = OpPhase::Submitting;
        debug!(
            product = %product.product_id,
            quantity,
            unit = %unit,
            "add to cart submitting"
        );
        let txn = Transaction::begin(view);
        self.apply_optimistic_add(view, product, unit, total, quantity, &ids);

        let persisted = self
            .persist_add(product, unit, quantity, size_surcharge, dims, &ids, &entries)
            .await;

        match persisted {
            Ok((outcome, line)) => {
                // Reconcile the optimistic state with the store's verdict:
                // drop the placeholder and adopt the authoritative line.
                view.lines.retain(|l| l.line.cart_id.is_persisted());
                match view.find_mut(line.cart_id) {
                    Some(existing) => {
                        existing.line = line;
                        existing.variant_ids = ids;
                        existing.busy = false;
                    }
                    None => view.lines.push(CartLineView::new(line, ids)),
                }
                txn.commit();
                self.phase = OpPhase::Committed;
                Ok(outcome)
            }
            Err(err) => {
                self.phase = OpPhase::Failed;
                txn.rollback(view);
                self.phase = OpPhase::RolledBack;
                warn!(error = %err, "add to cart failed, local state rolled back");
                Err(err)
            }
        }
    }

    /// Commit a quantity edit on an existing line. The total is recomputed
    /// from the line's last known unit price.
    pub async fn set_quantity(
        &mut self,
        view: &mut CartView,
        cart_id: CartId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if !quantity_in_bounds(quantity) {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let unit = match view.find(cart_id) {
            Some(line) if line.busy => return Err(CommerceError::OperationInFlight(cart_id)),
            Some(line) => line.line.base_price,
            None => return Err(CommerceError::LineNotFound(cart_id)),
        };
        let total = pricing::total_price(unit, quantity)?;

        self.phase = OpPhase::Submitting;
        let txn = Transaction::begin(view);
        if let Some(line) = view.find_mut(cart_id) {
            line.busy = true;
            line.line.quantity = quantity;
            line.line.total_price = total;
        }

        let patch = row! {
            "quantity" => quantity,
            "total_price" => total.to_decimal(),
        };
        match self
            .store
            .update(CART_TABLE, &self.cart_filter(cart_id), patch)
            .await
        {
            Ok(0) => {
                // Deleted elsewhere: surface once and drop the local line.
                txn.rollback(view);
                view.remove(cart_id);
                self.phase = OpPhase::RolledBack;
                Err(CommerceError::LineNotFound(cart_id))
            }
            Ok(_) => {
                if let Some(line) = view.find_mut(cart_id) {
                    line.busy = false;
                }
                txn.commit();
                self.phase = OpPhase::Committed;
                Ok(())
            }
            Err(err) => {
                self.phase = OpPhase::Failed;
                txn.rollback(view);
                self.phase = OpPhase::RolledBack;
                warn!(cart_id = %cart_id, error = %err, "quantity edit failed, rolled back");
                Err(err.into())
            }
        }
    }

    /// Remove a line and its attached rows.
    pub async fn remove_line(
        &mut self,
        view: &mut CartView,
        cart_id: CartId,
    ) -> Result<(), CommerceError> {
        match view.find(cart_id) {
            Some(line) if line.busy => return Err(CommerceError::OperationInFlight(cart_id)),
            Some(_) => {}
            None => return Err(CommerceError::LineNotFound(cart_id)),
        }

        self.phase = OpPhase::Submitting;
        let txn = Transaction::begin(view);
        view.remove(cart_id);

        match self.persist_remove(cart_id).await {
            Ok(0) => {
                // Already gone; the local removal stands.
                txn.commit();
                self.phase = OpPhase::Committed;
                Err(CommerceError::LineNotFound(cart_id))
            }
            Ok(_) => {
                txn.commit();
                self.phase = OpPhase::Committed;
                Ok(())
            }
            Err(err) => {
                self.phase = OpPhase::Failed;
                txn.rollback(view);
                self.phase = OpPhase::RolledBack;
                warn!(cart_id = %cart_id, error = %err, "remove failed, rolled back");
                Err(err.into())
            }
        }
    }

    /// Delete a line's attachments, then the line itself.
    ///
    /// A failure after the attachments are gone restores them from a
    /// pre-delete snapshot: a line that survives a failed remove must keep
    /// its variant rows, or its configuration identity would collapse to the
    /// empty set and absorb unrelated adds.
    async fn persist_remove(&self, cart_id: CartId) -> Result<u64, StoreError> {
        let by_cart = Filter::new().eq("cart_id", cart_id.as_i64());
        let variants = self.store.select(CART_VARIANTS_TABLE, &by_cart).await?;
        let dimensions = self.store.select(CART_DIMENSIONS_TABLE, &by_cart).await?;

        self.store.delete(CART_VARIANTS_TABLE, &by_cart).await?;
        if let Err(err) = self.store.delete(CART_DIMENSIONS_TABLE, &by_cart).await {
            self.restore_rows(CART_VARIANTS_TABLE, &variants).await;
            return Err(err);
        }
        match self.store.delete(CART_TABLE, &self.cart_filter(cart_id)).await {
            Ok(deleted) => Ok(deleted),
            Err(err) => {
                self.restore_rows(CART_VARIANTS_TABLE, &variants).await;
                self.restore_rows(CART_DIMENSIONS_TABLE, &dimensions).await;
                Err(err)
            }
        }
    }

    /// Best-effort re-insert of rows removed by an aborted delete.
    async fn restore_rows(&self, table: &str, rows: &[Row]) {
        for row in rows {
            if let Err(e) = self.store.insert(table, row.clone()).await {
                warn!(table, error = %e, "failed to restore row after aborted remove");
            }
        }
    }

    /// Write the selection directly to a known cart line: the edit-in-place
    /// flow after the user re-opened a cart line on its product page. No
    /// matching step; variants are fully replaced and the dimension row is
    /// upserted.
    pub async fn edit_in_place(
        &mut self,
        view: &mut CartView,
        cart_id: CartId,
        product: &ProductContext,
        selection: &SelectionState,
    ) -> Result<(), CommerceError> {
        if !product.product_id.is_persisted() {
            return Err(CommerceError::Validation("missing product identity".into()));
        }
        let quantity = selection.quantity();
        if !quantity_in_bounds(quantity) {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if let Some(line) = view.find(cart_id) {
            if line.busy {
                return Err(CommerceError::OperationInFlight(cart_id));
            }
        }

        let spec = product.spec.as_ref();
        let dims = selection.dimensions();
        let unit = pricing::unit_price(product.base_price, dims, spec, selection)?;
        let total = pricing::total_price(unit, quantity)?;
        let size_surcharge = match spec {
            Some(spec) => Some(size_component(product.base_price, dims, spec)?),
            None => None,
        };
        let entries = selection.entries(spec);
        let ids = matcher::catalog_ids(&entries);

        self.phase = OpPhase::Submitting;
        let txn = Transaction::begin(view);
        if let Some(line) = view.find_mut(cart_id) {
            line.busy = true;
            line.line.quantity = quantity;
            line.line.base_price = unit;
            line.line.total_price = total;
            line.variant_ids = ids.clone();
        }

        let persisted = self
            .persist_edit(cart_id, unit, total, quantity, size_surcharge, dims, &entries)
            .await;

        match persisted {
            Ok(()) => {
                if let Some(line) = view.find_mut(cart_id) {
                    line.busy = false;
                }
                txn.commit();
                self.phase = OpPhase::Committed;
                Ok(())
            }
            Err(err @ CommerceError::LineNotFound(_)) => {
                txn.rollback(view);
                view.remove(cart_id);
                self.phase = OpPhase::RolledBack;
                Err(err)
            }
            Err(err) => {
                self.phase = OpPhase::Failed;
                txn.rollback(view);
                self.phase = OpPhase::RolledBack;
                warn!(cart_id = %cart_id, error = %err, "edit in place failed, rolled back");
                Err(err)
            }
        }
    }

    fn is_local_match(
        &self,
        line: &CartLineView,
        product_id: ProductId,
        ids: &BTreeSet<VariantValueId>,
    ) -> bool {
        line.line.product_id == product_id
            && matcher::same_configuration(&line.variant_ids, ids)
    }

    /// Mutate the local view before the store round-trips complete.
    fn apply_optimistic_add(
        &self,
        view: &mut CartView,
        product: &ProductContext,
        unit: Money,
        total: Money,
        quantity: i64,
        ids: &BTreeSet<VariantValueId>,
    ) {
        match view
            .lines
            .iter_mut()
            .find(|l| {
                l.line.product_id == product.product_id
                    && matcher::same_configuration(&l.variant_ids, ids)
            }) {
            Some(line) => {
                line.busy = true;
                let new_quantity = (line.line.quantity + quantity).min(MAX_QUANTITY);
                line.line.quantity = new_quantity;
                line.line.base_price = unit;
                // Saturating display total; the persisted total is checked.
                line.line.total_price =
                    Money::new(unit.amount_cents.saturating_mul(new_quantity), unit.currency);
            }
            None => {
                let line = CartLine {
                    cart_id: CartId::new(0),
                    user_id: self.user_id,
                    product_id: product.product_id,
                    quantity,
                    base_price: unit,
                    total_price: total,
                    route: product.route.clone(),
                    slug: product.slug.clone(),
                };
                let mut pending = CartLineView::new(line, ids.clone());
                pending.busy = true;
                view.lines.push(pending);
            }
        }
    }

    async fn persist_add(
        &self,
        product: &ProductContext,
        unit: Money,
        quantity: i64,
        size_surcharge: Option<Money>,
        dims: Dimensions,
        ids: &BTreeSet<VariantValueId>,
        entries: &[SelectedEntry],
    ) -> Result<(AddOutcome, CartLine), CommerceError> {
        let rows = self
            .store
            .select(CART_TABLE, &self.user_product_filter(product.product_id))
            .await?;

        for row in &rows {
            let line = CartLine::from_row(row, self.currency)?;
            let existing_ids = self.variant_ids_for(line.cart_id).await?;
            if !matcher::same_configuration(&existing_ids, ids) {
                continue;
            }

            let new_quantity = (line.quantity + quantity).min(MAX_QUANTITY);
            let total = pricing::total_price(unit, new_quantity)?;
            let patch = row! {
                "quantity" => new_quantity,
                "base_price" => unit.to_decimal(),
                "total_price" => total.to_decimal(),
            };
            let affected = self
                .store
                .update(CART_TABLE, &self.cart_filter(line.cart_id), patch)
                .await?;
            if affected == 0 {
                return Err(CommerceError::LineNotFound(line.cart_id));
            }

            debug!(cart_id = %line.cart_id, new_quantity, "merged into existing cart line");
            let merged = CartLine {
                quantity: new_quantity,
                base_price: unit,
                total_price: total,
                ..line
            };
            return Ok((
                AddOutcome::Merged {
                    cart_id: merged.cart_id,
                    quantity: new_quantity,
                },
                merged,
            ));
        }

        // No match: insert the line, then its variants and dimension row.
        let mut line = CartLine {
            cart_id: CartId::new(0),
            user_id: self.user_id,
            product_id: product.product_id,
            quantity,
            base_price: unit,
            total_price: pricing::total_price(unit, quantity)?,
            route: product.route.clone(),
            slug: product.slug.clone(),
        };
        let inserted = self.store.insert(CART_TABLE, line.to_row()).await?;
        let cart_id = CartId::new(
            inserted
                .get("cart_id")
                .and_then(Value::as_integer)
                .unwrap_or(0),
        );
        if !cart_id.is_persisted() {
            return Err(CommerceError::Persistence(StoreError::Backend(
                "store did not assign a cart_id".to_string(),
            )));
        }
        line.cart_id = cart_id;

        for entry in entries {
            if let SelectedEntry::CatalogVariant { id, price_delta } = entry {
                let variant = CartLineVariant {
                    cart_id,
                    variant_value_id: *id,
                    price: *price_delta,
                };
                if let Err(source) = self.store.insert(CART_VARIANTS_TABLE, variant.to_row()).await
                {
                    self.compensate(cart_id).await;
                    return Err(CommerceError::PartialFailure {
                        cart_id,
                        step: "variants",
                        source,
                    });
                }
            }
        }

        if let Some(price) = size_surcharge {
            let dimension = CartDimension {
                cart_id,
                length: dims.length,
                width: dims.width,
                price,
            };
            if let Err(source) = self
                .store
                .insert(CART_DIMENSIONS_TABLE, dimension.to_row())
                .await
            {
                self.compensate(cart_id).await;
                return Err(CommerceError::PartialFailure {
                    cart_id,
                    step: "dimension",
                    source,
                });
            }
        }

        debug!(cart_id = %cart_id, quantity, "inserted new cart line");
        Ok((AddOutcome::Inserted { cart_id }, line))
    }

    async fn persist_edit(
        &self,
        cart_id: CartId,
        unit: Money,
        total: Money,
        quantity: i64,
        size_surcharge: Option<Money>,
        dims: Dimensions,
        entries: &[SelectedEntry],
    ) -> Result<(), CommerceError> {
        let patch = row! {
            "quantity" => quantity,
            "base_price" => unit.to_decimal(),
            "total_price" => total.to_decimal(),
        };
        let affected = self
            .store
            .update(CART_TABLE, &self.cart_filter(cart_id), patch)
            .await?;
        if affected == 0 {
            return Err(CommerceError::LineNotFound(cart_id));
        }

        // Full replacement: delete all, re-insert the new configuration.
        let by_cart = Filter::new().eq("cart_id", cart_id.as_i64());
        self.store.delete(CART_VARIANTS_TABLE, &by_cart).await?;
        for entry in entries {
            if let SelectedEntry::CatalogVariant { id, price_delta } = entry {
                let variant = CartLineVariant {
                    cart_id,
                    variant_value_id: *id,
                    price: *price_delta,
                };
                if let Err(source) = self.store.insert(CART_VARIANTS_TABLE, variant.to_row()).await
                {
                    // Compensate this operation's inserts; the line keeps
                    // its updated quantity but no half-written variants.
                    if let Err(e) = self.store.delete(CART_VARIANTS_TABLE, &by_cart).await {
                        warn!(cart_id = %cart_id, error = %e, "compensating delete failed");
                    }
                    return Err(CommerceError::PartialFailure {
                        cart_id,
                        step: "variants",
                        source,
                    });
                }
            }
        }

        if let Some(price) = size_surcharge {
            let dim_patch = row! {
                "length" => dims.length,
                "width" => dims.width,
                "price" => price.to_decimal(),
            };
            let updated = self
                .store
                .update(CART_DIMENSIONS_TABLE, &by_cart, dim_patch)
                .await;
            let needs_insert = match updated {
                Ok(0) => true,
                Ok(_) => false,
                Err(source) => {
                    return Err(CommerceError::PartialFailure {
                        cart_id,
                        step: "dimension",
                        source,
                    })
                }
            };
            if needs_insert {
                let dimension = CartDimension {
                    cart_id,
                    length: dims.length,
                    width: dims.width,
                    price,
                };
                if let Err(source) = self
                    .store
                    .insert(CART_DIMENSIONS_TABLE, dimension.to_row())
                    .await
                {
                    return Err(CommerceError::PartialFailure {
                        cart_id,
                        step: "dimension",
                        source,
                    });
                }
            }
        }

        Ok(())
    }

    /// The catalog-backed variant IDs attached to a persisted line.
    async fn variant_ids_for(
        &self,
        cart_id: CartId,
    ) -> Result<BTreeSet<VariantValueId>, StoreError> {
        let rows = self
            .store
            .select(
                CART_VARIANTS_TABLE,
                &Filter::new().eq("cart_id", cart_id.as_i64()),
            )
            .await?;
        let mut ids = BTreeSet::new();
        for row in &rows {
            let variant = CartLineVariant::from_row(row, self.currency)?;
            ids.insert(variant.variant_value_id);
        }
        Ok(ids)
    }

    /// Compensating deletes after a failed multi-step insert: variants,
    /// then the line, so no orphan cart line stays visible.
    async fn compensate(&self, cart_id: CartId) {
        warn!(cart_id = %cart_id, "partial failure, issuing compensating deletes");
        let by_cart = Filter::new().eq("cart_id", cart_id.as_i64());
        if let Err(e) = self.store.delete(CART_VARIANTS_TABLE, &by_cart).await {
            warn!(cart_id = %cart_id, error = %e, "compensating variant delete failed");
        }
        if let Err(e) = self.store.delete(CART_TABLE, &self.cart_filter(cart_id)).await {
            warn!(cart_id = %cart_id, error = %e, "compensating line delete failed");
        }
    }

    fn user_product_filter(&self, product: ProductId) -> Filter {
        Filter::new()
            .eq("user_id", self.user_id.as_i64())
            .eq("product_id", product.as_i64())
    }

    fn cart_filter(&self, cart_id: CartId) -> Filter {
        Filter::new()
            .eq("cart_id", cart_id.as_i64())
            .eq("user_id", self.user_id.as_i64())
    }
}

fn size_component(
    base: Money,
    dims: Dimensions,
    spec: &ResolvedSpec,
) -> Result<Money, CommerceError> {
    let sized = pricing::size_price(base, dims, Some(spec))?;
    sized.try_subtract(&base).ok_or(CommerceError::Overflow)
}
