//! Persisted cart line types and their row encodings.
//!
//! The store owns these rows exclusively; the UI never treats them as
//! authoritative until persistence confirms them. See
//! [`crate::cart::CartView`] for the optimistic local copy.

use crate::ids::{CartId, ProductId, UserId, VariantValueId};
use crate::money::{Currency, Money};
use inkcart_store::{row, Row, StoreError};
use serde::Deserialize;

/// Cart line table.
pub const CART_TABLE: &str = "cart";
/// Selected variant values, 1:N with cart lines.
pub const CART_VARIANTS_TABLE: &str = "cart_variants";
/// Custom dimensions, 0..1 per cart line.
pub const CART_DIMENSIONS_TABLE: &str = "cart_dimensions";

/// One persisted row representing a quantity of one specific product
/// configuration in a user's cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price snapshot at the last write.
    pub base_price: Money,
    pub total_price: Money,
    /// Product page route, for navigating back from the cart.
    pub route: String,
    pub slug: String,
}

#[derive(Deserialize)]
struct CartLineRepr {
    cart_id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    base_price: f64,
    total_price: f64,
    #[serde(default)]
    route: String,
    #[serde(default)]
    slug: String,
}

impl CartLine {
    /// Encode for insert/update. The cart_id column is omitted for
    /// unpersisted lines so the store assigns one.
    pub fn to_row(&self) -> Row {
        let mut row = row! {
            "user_id" => self.user_id.as_i64(),
            "product_id" => self.product_id.as_i64(),
            "quantity" => self.quantity,
            "base_price" => self.base_price.to_decimal(),
            "total_price" => self.total_price.to_decimal(),
            "route" => self.route.as_str(),
            "slug" => self.slug.as_str(),
        };
        if self.cart_id.is_persisted() {
            row.set("cart_id", self.cart_id.as_i64().into());
        }
        row
    }

    /// Decode a stored row.
    pub fn from_row(row: &Row, currency: Currency) -> Result<Self, StoreError> {
        let repr: CartLineRepr = row.deserialize()?;
        Ok(Self {
            cart_id: CartId::new(repr.cart_id),
            user_id: UserId::new(repr.user_id),
            product_id: ProductId::new(repr.product_id),
            quantity: repr.quantity,
            base_price: Money::from_decimal(repr.base_price, currency),
            total_price: Money::from_decimal(repr.total_price, currency),
            route: repr.route,
            slug: repr.slug,
        })
    }
}

/// One selected variant value attached to a cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineVariant {
    pub cart_id: CartId,
    /// The catalog variant-value ID.
    pub variant_value_id: VariantValueId,
    /// Surcharge snapshot at the time of the write.
    pub price: Money,
}

#[derive(Deserialize)]
struct CartLineVariantRepr {
    cart_id: i64,
    cartvariant_id: i64,
    price: f64,
}

impl CartLineVariant {
    pub fn to_row(&self) -> Row {
        row! {
            "cart_id" => self.cart_id.as_i64(),
            "cartvariant_id" => self.variant_value_id.as_i64(),
            "price" => self.price.to_decimal(),
        }
    }

    pub fn from_row(row: &Row, currency: Currency) -> Result<Self, StoreError> {
        let repr: CartLineVariantRepr = row.deserialize()?;
        Ok(Self {
            cart_id: CartId::new(repr.cart_id),
            variant_value_id: VariantValueId::new(repr.cartvariant_id),
            price: Money::from_decimal(repr.price, currency),
        })
    }
}

/// Custom dimensions attached to a cart line, present only when the product
/// has a dimension spec.
#[derive(Debug, Clone, PartialEq)]
pub struct CartDimension {
    pub cart_id: CartId,
    pub length: f64,
    pub width: f64,
    /// The size surcharge component of the unit price.
    pub price: Money,
}

#[derive(Deserialize)]
struct CartDimensionRepr {
    cart_id: i64,
    length: f64,
    width: f64,
    price: f64,
}

impl CartDimension {
    pub fn to_row(&self) -> Row {
        row! {
            "cart_id" => self.cart_id.as_i64(),
            "length" => self.length,
            "width" => self.width,
            "price" => self.price.to_decimal(),
        }
    }

    pub fn from_row(row: &Row, currency: Currency) -> Result<Self, StoreError> {
        let repr: CartDimensionRepr = row.deserialize()?;
        Ok(Self {
            cart_id: CartId::new(repr.cart_id),
            length: repr.length,
            width: repr.width,
            price: Money::from_decimal(repr.price, currency),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CartLine {
        CartLine {
            cart_id: CartId::new(3),
            user_id: UserId::new(7),
            product_id: ProductId::new(5),
            quantity: 2,
            base_price: Money::new(10150, Currency::USD),
            total_price: Money::new(20300, Currency::USD),
            route: "/products/banner".to_string(),
            slug: "vinyl-banner".to_string(),
        }
    }

    #[test]
    fn test_cart_line_row_roundtrip() {
        let original = line();
        let decoded = CartLine::from_row(&original.to_row(), Currency::USD).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_unpersisted_line_omits_cart_id() {
        let mut l = line();
        l.cart_id = CartId::new(0);
        assert!(l.to_row().get("cart_id").is_none());
    }

    #[test]
    fn test_variant_row_roundtrip() {
        let original = CartLineVariant {
            cart_id: CartId::new(3),
            variant_value_id: VariantValueId::new(11),
            price: Money::new(250, Currency::USD),
        };
        let decoded = CartLineVariant::from_row(&original.to_row(), Currency::USD).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_dimension_row_roundtrip() {
        let original = CartDimension {
            cart_id: CartId::new(3),
            length: 0.9,
            width: 0.6,
            price: Money::new(150, Currency::USD),
        };
        let decoded = CartDimension::from_row(&original.to_row(), Currency::USD).unwrap();
        assert_eq!(decoded, original);
    }
}
