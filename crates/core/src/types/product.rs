//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as published by the catalog data source.
///
/// Products are created once when the catalog loads and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Unit price in US dollars.
    pub price: Decimal,
    /// Image variants; the data source names this field `image`.
    #[serde(rename = "image")]
    pub images: ProductImages,
}

impl Product {
    /// Highest unit price a catalog may publish.
    ///
    /// Keeps every line total and cart total exact: even `u32::MAX` units of
    /// every product stay well inside the range of [`Decimal`].
    pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    /// Whether the price is within `0..=MAX_PRICE`.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        !self.price.is_sign_negative() && self.price <= Self::MAX_PRICE
    }

    /// Unit price with currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}

/// Paths to the responsive renditions of a product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub thumbnail: String,
    pub mobile: String,
    pub tablet: String,
    pub desktop: String,
}
