//! The product catalog loaded once per session.

use std::collections::HashMap;

use crate::types::{Product, ProductId};

/// Ordered, read-only collection of products with an id lookup.
///
/// Ids are expected to be unique in the source data. This is not checked;
/// a repeated id makes [`Catalog::get`] resolve to the later record.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, preserving the order of `products`.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();

        Self { products, index }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// Products in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
