//! End-to-end flow over an in-memory store: load the catalog, configure a
//! product, add it to the cart twice, edit the quantity, and remove it.

use inkcart_cache::TtlCache;
use inkcart_commerce::cart::{CART_DIMENSIONS_TABLE, CART_TABLE, CART_VARIANTS_TABLE};
use inkcart_commerce::catalog::{PRODUCT_VARIANT_VALUES_TABLE, SIZE_DIMENSIONS_TABLE};
use inkcart_commerce::prelude::*;
use inkcart_store::{row, Filter, MemStore, Row, RowStore};
use std::sync::Arc;

const PRODUCT: i64 = 5;
const USER: i64 = 7;

fn catalog_row(value_id: i64, value: &str, price: f64, is_default: i64, group_id: i64, group: &str) -> Row {
    row! {
        "product_id" => PRODUCT,
        "variant_value_id" => value_id,
        "price" => price,
        "is_default" => is_default,
        "value_name" => value,
        "group_id" => group_id,
        "group_name" => group,
        "input_type" => "button",
    }
}

/// A banner-like product: one material group, one finish group, and a
/// continuous-size spec at $0.50 per 0.1 m step.
async fn seed(store: &MemStore) {
    for r in [
        catalog_row(11, "Vinyl", 0.0, 1, 1, "Material"),
        catalog_row(12, "Mesh", 2.5, 0, 1, "Material"),
        catalog_row(21, "Matte", 0.0, 1, 2, "Finish"),
        catalog_row(22, "Gloss", 1.0, 0, 2, "Finish"),
    ] {
        store.insert(PRODUCT_VARIANT_VALUES_TABLE, r).await.unwrap();
    }
    store
        .insert(
            SIZE_DIMENSIONS_TABLE,
            row! {
                "product_id" => PRODUCT,
                "target" => "default",
                "min_length" => 0.6,
                "max_length" => 3.0,
                "length_increment" => 0.1,
                "min_width" => 0.6,
                "max_width" => 1.5,
                "width_increment" => 0.1,
                "price_per_increment" => 0.5,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_full_product_to_cart_flow() {
    let store = Arc::new(MemStore::new().with_table(CART_TABLE, "cart_id"));
    seed(&store).await;

    let catalog = CatalogService::new(store.clone(), Arc::new(TtlCache::new()), Currency::USD);
    let groups = catalog.variant_groups(ProductId::new(PRODUCT)).await.unwrap();
    assert_eq!(groups.len(), 2);
    let spec = catalog
        .size_spec(ProductId::new(PRODUCT), None)
        .await
        .unwrap()
        .expect("banner products have continuous sizing");

    // Product page: defaults preselected, then the user upgrades the
    // material, sizes the banner, and picks a quantity.
    let mut selection = SelectionState::from_defaults(&groups);
    let mesh = groups[0].value(VariantValueId::new(12)).unwrap().clone();
    selection.select(groups[0].id, mesh);
    selection.set_dimensions(Dimensions::new(0.9, 0.6), Some(&spec));
    selection.set_quantity(2);

    let base = Money::new(10000, Currency::USD);
    // base 100.00 + 3 length steps at 0.50 + mesh 2.50 = 104.00
    let unit = pricing::unit_price(base, selection.dimensions(), Some(&spec), &selection).unwrap();
    assert_eq!(unit, Money::new(10400, Currency::USD));

    let product = ProductContext {
        product_id: ProductId::new(PRODUCT),
        base_price: base,
        route: "/products/vinyl-banner".to_string(),
        slug: "vinyl-banner".to_string(),
        spec: Some(spec.clone()),
    };

    let mut reconciler =
        CartReconciler::new(store.clone(), UserId::new(USER), Currency::USD);
    let mut view = CartView::new();

    // First add inserts a line plus its variant and dimension rows.
    let outcome = reconciler
        .add_or_update(&mut view, &product, &selection)
        .await
        .unwrap();
    let cart_id = match outcome {
        AddOutcome::Inserted { cart_id } => cart_id,
        other => panic!("expected insert, got {other:?}"),
    };
    assert_eq!(store.row_count(CART_TABLE), 1);
    assert_eq!(store.row_count(CART_VARIANTS_TABLE), 2);
    assert_eq!(store.row_count(CART_DIMENSIONS_TABLE), 1);

    // Adding the identical configuration again merges quantities.
    let outcome = reconciler
        .add_or_update(&mut view, &product, &selection)
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::Merged { cart_id, quantity: 4 });
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.subtotal(Currency::USD), Some(Money::new(10400 * 4, Currency::USD)));

    // A different finish is a different configuration: a second line.
    let mut gloss_selection = selection.clone();
    let gloss = groups[1].value(VariantValueId::new(22)).unwrap().clone();
    gloss_selection.select(groups[1].id, gloss);
    let outcome = reconciler
        .add_or_update(&mut view, &product, &gloss_selection)
        .await
        .unwrap();
    assert!(matches!(outcome, AddOutcome::Inserted { .. }));
    assert_eq!(view.lines.len(), 2);
    assert_eq!(store.row_count(CART_TABLE), 2);

    // Cart page: a free-text quantity edit, clamped on commit.
    let mut field = QuantityField::new(4);
    field.begin_edit();
    field.input("250");
    let candidate = field.commit();
    assert_eq!(candidate, 100);
    reconciler
        .set_quantity(&mut view, cart_id, candidate)
        .await
        .unwrap();
    field.confirm(candidate);
    assert_eq!(view.find(cart_id).unwrap().line.quantity, 100);
    assert_eq!(
        view.find(cart_id).unwrap().line.total_price,
        Money::new(10400 * 100, Currency::USD)
    );

    // Removing the line clears every attached row.
    reconciler.remove_line(&mut view, cart_id).await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(store.row_count(CART_TABLE), 1);
    let orphaned_variants = store
        .select(CART_VARIANTS_TABLE, &Filter::new().eq("cart_id", cart_id.as_i64()))
        .await
        .unwrap();
    assert!(orphaned_variants.is_empty());
}

#[tokio::test]
async fn test_cart_rehydration_matches_original_selection() {
    let store = Arc::new(MemStore::new().with_table(CART_TABLE, "cart_id"));
    seed(&store).await;

    let catalog = CatalogService::new(store.clone(), Arc::new(TtlCache::new()), Currency::USD);
    let groups = catalog.variant_groups(ProductId::new(PRODUCT)).await.unwrap();
    let spec = catalog
        .size_spec(ProductId::new(PRODUCT), None)
        .await
        .unwrap()
        .unwrap();

    let mut selection = SelectionState::from_defaults(&groups);
    selection.set_dimensions(Dimensions::new(1.2, 0.8), Some(&spec));
    selection.set_quantity(3);

    let base = Money::new(10000, Currency::USD);
    let product = ProductContext {
        product_id: ProductId::new(PRODUCT),
        base_price: base,
        route: String::new(),
        slug: String::new(),
        spec: Some(spec.clone()),
    };
    let mut reconciler =
        CartReconciler::new(store.clone(), UserId::new(USER), Currency::USD);
    let mut view = CartView::new();
    reconciler
        .add_or_update(&mut view, &product, &selection)
        .await
        .unwrap();
    let cart_id = view.lines[0].line.cart_id;

    // Re-open the line on its product page: persisted variant and dimension
    // rows rebuild the exact same configuration.
    let variant_rows = store
        .select(CART_VARIANTS_TABLE, &Filter::new().eq("cart_id", cart_id.as_i64()))
        .await
        .unwrap();
    let variant_ids: Vec<VariantValueId> = variant_rows
        .iter()
        .map(|r| CartLineVariant::from_row(r, Currency::USD).unwrap().variant_value_id)
        .collect();
    let dim_rows = store
        .select(CART_DIMENSIONS_TABLE, &Filter::new().eq("cart_id", cart_id.as_i64()))
        .await
        .unwrap();
    let dimension = CartDimension::from_row(&dim_rows[0], Currency::USD).unwrap();

    let rehydrated = SelectionState::rehydrate(&groups, &variant_ids, Some(&dimension), 3);
    assert_eq!(rehydrated.catalog_ids(), selection.catalog_ids());
    assert_eq!(rehydrated.dimensions(), selection.dimensions());
    assert_eq!(rehydrated.quantity(), 3);

    let original_unit =
        pricing::unit_price(base, selection.dimensions(), Some(&spec), &selection).unwrap();
    let rehydrated_unit =
        pricing::unit_price(base, rehydrated.dimensions(), Some(&spec), &rehydrated).unwrap();
    assert_eq!(original_unit, rehydrated_unit);
}
