//! Cached catalog loading over the row store.

use crate::catalog::{
    normalize, resolve, DimensionSpec, DimensionSpecRow, RawVariantRow, ResolvedSpec, VariantGroup,
};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use inkcart_cache::{cache_key, TtlCache};
use inkcart_store::{Filter, RowStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Read-only variant catalog table.
pub const PRODUCT_VARIANT_VALUES_TABLE: &str = "product_variant_values";
/// Read-only continuous-size spec table.
pub const SIZE_DIMENSIONS_TABLE: &str = "size_dimension_customizable";

/// Catalog rows change rarely; five minutes keeps product pages warm.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Loads and caches per-product catalog data.
///
/// The cache is injected, not ambient: callers own its lifetime and can
/// share one instance across product pages.
pub struct CatalogService {
    store: Arc<dyn RowStore>,
    cache: Arc<TtlCache>,
    currency: Currency,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RowStore>, cache: Arc<TtlCache>, currency: Currency) -> Self {
        Self {
            store,
            cache,
            currency,
        }
    }

    /// Load the normalized variant groups for a product.
    ///
    /// Rows that fail to decode are skipped; the product degrades to fewer
    /// options instead of failing the render.
    pub async fn variant_groups(
        &self,
        product: ProductId,
    ) -> Result<Vec<VariantGroup>, CommerceError> {
        let key = cache_key!("variants", product);
        if let Some(groups) = self.cache.get::<Vec<VariantGroup>>(&key)? {
            debug!(product = %product, "variant catalog cache hit");
            return Ok(groups);
        }

        let rows = self
            .store
            .select(
                PRODUCT_VARIANT_VALUES_TABLE,
                &Filter::new().eq("product_id", product.as_i64()),
            )
            .await?;

        let raw: Vec<RawVariantRow> = rows
            .iter()
            .filter_map(|row| match row.deserialize::<RawVariantRow>() {
                Ok(raw) => Some(raw),
                Err(e) => {
                    debug!(product = %product, error = %e, "skipping corrupt catalog row");
                    None
                }
            })
            .collect();

        let groups = normalize(&raw, self.currency);
        self.cache.set(&key, &groups, Some(CATALOG_TTL))?;
        Ok(groups)
    }

    /// Load the dimension specs applicable to a product, resolved against
    /// the current product subtype. `None` means no continuous sizing.
    pub async fn size_spec(
        &self,
        product: ProductId,
        subtype: Option<&str>,
    ) -> Result<Option<ResolvedSpec>, CommerceError> {
        let key = cache_key!("sizespec", product);
        let specs = match self.cache.get::<Vec<DimensionSpec>>(&key)? {
            Some(specs) => {
                debug!(product = %product, "dimension spec cache hit");
                specs
            }
            None => {
                let rows = self
                    .store
                    .select(
                        SIZE_DIMENSIONS_TABLE,
                        &Filter::new().eq("product_id", product.as_i64()),
                    )
                    .await?;
                let specs: Vec<DimensionSpec> = rows
                    .iter()
                    .filter_map(|row| match row.deserialize::<DimensionSpecRow>() {
                        Ok(raw) => Some(DimensionSpec::from_row(&raw, self.currency)),
                        Err(e) => {
                            debug!(product = %product, error = %e, "skipping corrupt spec row");
                            None
                        }
                    })
                    .collect();
                self.cache.set(&key, &specs, Some(CATALOG_TTL))?;
                specs
            }
        };
        Ok(resolve(specs, subtype))
    }
}
