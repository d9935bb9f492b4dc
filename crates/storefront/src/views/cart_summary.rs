//! Cart summary view: line items, totals and the empty state.

use std::sync::Arc;

use askama::Template;
use dessert_cart_core::{
    Cart, CartChange, CartLine, Catalog, Product, ProductId, format_currency,
};
use rust_decimal::Decimal;
use tracing::error;

use super::container::{HtmlRows, RowContainer};

/// Cart line fragment.
#[derive(Template)]
#[template(path = "partials/cart_line.html")]
struct CartLineTemplate<'a> {
    product: &'a Product,
    quantity: u32,
    unit_price: String,
    line_total: String,
}

impl<'a> From<&CartLine<'a>> for CartLineTemplate<'a> {
    fn from(line: &CartLine<'a>) -> Self {
        Self {
            product: line.product,
            quantity: line.quantity.get(),
            unit_price: line.product.unit_price().display(),
            line_total: format_currency(line.line_total()),
        }
    }
}

/// Empty cart fragment.
#[derive(Template)]
#[template(path = "partials/cart_empty.html")]
struct CartEmptyTemplate;

/// Whole summary section.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
struct CartSummaryTemplate<'a> {
    rows: Vec<&'a str>,
    total_quantity: u64,
    total_price: String,
    is_empty: bool,
}

/// Renders the cart contents and totals, rebuilt in full on every change.
#[derive(Debug)]
pub struct CartSummaryView<C = HtmlRows> {
    catalog: Arc<Catalog>,
    container: C,
    total_quantity: u64,
    total_price: Decimal,
    markup: String,
}

impl<C: RowContainer> CartSummaryView<C> {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, container: C) -> Self {
        Self {
            catalog,
            container,
            total_quantity: 0,
            total_price: Decimal::ZERO,
            markup: String::new(),
        }
    }

    /// Rebuild every line, the totals and the section markup.
    ///
    /// # Errors
    ///
    /// Returns the template error if any fragment fails to render; the view
    /// keeps its previous state in that case.
    pub fn render(&mut self, cart: &Cart) -> askama::Result<()> {
        let mut rows = cart
            .lines(&self.catalog)
            .map(|line| -> askama::Result<(Option<ProductId>, String)> {
                Ok((Some(line.product.id), CartLineTemplate::from(&line).render()?))
            })
            .collect::<askama::Result<Vec<_>>>()?;
        if rows.is_empty() {
            rows.push((None, CartEmptyTemplate.render()?));
        }

        let total_quantity = cart.total_quantity();
        let total_price = cart.total_price(&self.catalog);
        let markup = CartSummaryTemplate {
            rows: rows.iter().map(|(_, markup)| markup.as_str()).collect(),
            total_quantity,
            total_price: format_currency(total_price),
            is_empty: cart.is_empty(),
        }
        .render()?;

        self.container.clear();
        for (product_id, row) in rows {
            self.container.push_row(product_id, row);
        }
        self.total_quantity = total_quantity;
        self.total_price = total_price;
        self.markup = markup;
        Ok(())
    }

    /// Cart store observer.
    pub fn on_cart_change(&mut self, change: &CartChange, cart: &Cart) {
        if let Err(e) = self.render(cart) {
            error!(product_id = %change.product_id, error = %e, "Failed to re-render cart summary");
        }
    }

    /// Rendered summary section.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Sum of all quantities at the last render.
    #[must_use]
    pub const fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Sum of quantity × unit price at the last render.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    #[must_use]
    pub const fn container(&self) -> &C {
        &self.container
    }
}
