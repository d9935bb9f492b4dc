//! Cart state: which products are selected and in what quantity.
//!
//! The cart only stores quantities. Names and prices are joined from the
//! [`Catalog`] whenever lines or totals are read, so cart state never carries
//! stale product data.
//!
//! The only way to change a [`Cart`] is through a [`CartStore`], which
//! enforces the quantity floor and notifies observers after each operation.

mod store;

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::types::{Product, ProductId};

pub use store::{CartStore, Observer};

/// Errors returned by cart store operations.
///
/// Both variants are caller contract violations. The cart is left untouched
/// and no observer is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// `increment`/`decrement` called for a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The product id was never supplied by the catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}

/// The four cart intents a user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Add,
    Increment,
    Decrement,
    Delete,
}

impl CartAction {
    /// Name used in `data-action` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known action names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cart action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for CartAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "increment" => Ok(Self::Increment),
            "decrement" => Ok(Self::Decrement),
            "delete" => Ok(Self::Delete),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Notification payload handed to observers after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChange {
    pub product_id: ProductId,
    pub action: CartAction,
}

/// One selected product and its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    product_id: ProductId,
    quantity: NonZeroU32,
}

impl CartEntry {
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Always at least 1; an entry whose quantity would reach 0 is removed.
    #[must_use]
    pub const fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }
}

/// A cart entry joined with its catalog product.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: NonZeroU32,
}

impl CartLine<'_> {
    /// Quantity × unit price, saturating at the bounds of [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity.get()))
    }
}

/// Selected products in insertion order, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Quantity selected for a product, or `None` when it is not in the cart.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Option<NonZeroU32> {
        self.get(product_id).map(CartEntry::quantity)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.quantity.get()))
            .sum()
    }

    /// Entries joined with their catalog products, in insertion order.
    ///
    /// Entries whose product is missing from `catalog` are skipped; the store
    /// never admits such entries.
    pub fn lines<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = CartLine<'a>> {
        self.entries.iter().filter_map(|entry| {
            catalog.get(entry.product_id).map(|product| CartLine {
                product,
                quantity: entry.quantity,
            })
        })
    }

    /// Sum of quantity × unit price over all entries.
    ///
    /// Saturates instead of overflowing; [`Product::MAX_PRICE`] keeps real
    /// catalogs far from the limit.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> Decimal {
        self.lines(catalog)
            .map(|line| line.line_total())
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }

    /// Insert with quantity 1. Returns `false` if already present.
    fn insert(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.entries.push(CartEntry {
            product_id,
            quantity: NonZeroU32::MIN,
        });
        true
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }

    /// Remove an entry. Returns `false` if it was absent.
    fn remove(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }
}
