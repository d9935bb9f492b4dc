//! Product list view: one row per catalog product.

use std::num::NonZeroU32;
use std::sync::Arc;

use askama::Template;
use dessert_cart_core::{Cart, CartChange, Catalog, Product, ProductId};
use tracing::{debug, error};

use super::container::{HtmlRows, RowContainer};

/// Product row fragment.
#[derive(Template)]
#[template(path = "partials/product_row.html")]
struct ProductRowTemplate<'a> {
    product: &'a Product,
    price: String,
    quantity: Option<u32>,
}

fn render_row(product: &Product, quantity: Option<NonZeroU32>) -> askama::Result<String> {
    ProductRowTemplate {
        product,
        price: product.unit_price().display(),
        quantity: quantity.map(NonZeroU32::get),
    }
    .render()
}

/// Renders the catalog and keeps each row's cart controls in sync.
///
/// The full list is rendered once; after that, a cart change re-renders only
/// the row of the product it concerns.
#[derive(Debug)]
pub struct ProductListView<C = HtmlRows> {
    catalog: Arc<Catalog>,
    container: C,
    updated: Vec<ProductId>,
}

impl<C: RowContainer> ProductListView<C> {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, container: C) -> Self {
        Self {
            catalog,
            container,
            updated: Vec::new(),
        }
    }

    /// Render every catalog product from scratch.
    ///
    /// # Errors
    ///
    /// Returns the template error if any row fails to render; the container
    /// is left unchanged in that case.
    pub fn render(&mut self, cart: &Cart) -> askama::Result<()> {
        let rows = self
            .catalog
            .iter()
            .map(|product| -> askama::Result<(ProductId, String)> {
                Ok((product.id, render_row(product, cart.quantity(product.id))?))
            })
            .collect::<askama::Result<Vec<_>>>()?;

        self.container.clear();
        for (product_id, markup) in rows {
            self.container.push_row(Some(product_id), markup);
        }
        self.updated.clear();
        Ok(())
    }

    /// Re-render the row of one product from the current cart.
    ///
    /// Returns `Ok(false)` without touching anything when the product has no
    /// row on screen.
    ///
    /// # Errors
    ///
    /// Returns the template error if the row fails to render.
    pub fn update_row(&mut self, product_id: ProductId, cart: &Cart) -> askama::Result<bool> {
        let product = match self.catalog.get(product_id) {
            Some(product) if self.container.has_row(product_id) => product,
            _ => {
                debug!(%product_id, "No product row on screen, skipping update");
                return Ok(false);
            }
        };

        let markup = render_row(product, cart.quantity(product_id))?;
        self.container.replace_row(product_id, markup);
        if !self.updated.contains(&product_id) {
            self.updated.push(product_id);
        }
        Ok(true)
    }

    /// Cart store observer.
    pub fn on_cart_change(&mut self, change: &CartChange, cart: &Cart) {
        if let Err(e) = self.update_row(change.product_id, cart) {
            error!(product_id = %change.product_id, error = %e, "Failed to re-render product row");
        }
    }

    /// Ids of rows re-rendered since the last call, in update order.
    pub fn take_updated(&mut self) -> Vec<ProductId> {
        std::mem::take(&mut self.updated)
    }

    #[must_use]
    pub fn row_markup(&self, product_id: ProductId) -> Option<&str> {
        self.container
            .row(product_id)
            .map(|row| row.markup.as_str())
    }

    #[must_use]
    pub const fn container(&self) -> &C {
        &self.container
    }
}
