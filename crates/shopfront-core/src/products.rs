use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Catalog identifier of a product. Stable across fetches and unique within
/// a catalog.
pub type ProductId = u64;

/// A product as listed by the catalog API.
///
/// Only the fields the storefront displays are modelled; anything else the
/// API sends is ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Unit price. The API sends a JSON number (`9.99`); it is read through
    /// its decimal string form so no binary float error creeps into totals.
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    /// URL of the listing image.
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A product category as returned by `GET /products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name, e.g. `"Beauty"`.
    pub name: String,
    /// Absolute URL of the category-filtered product listing.
    pub url: String,
}

/// One product's entry in the cart.
///
/// Serialized flat, i.e. the product's own fields plus `quantity`, so a
/// stored cart is a plain array of product objects with a count attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartLine {
    /// Starts a new line for `product` with a quantity of 1.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity`, rounded to cents. Saturates at the `Decimal`
    /// bounds instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        round_to_cents(self.subtotal())
    }

    /// Unrounded `price × quantity`, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// Rounds a currency amount to two decimal places, halves away from zero.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
