//! Row containers: the rendering sink both views write into.

use dessert_cart_core::ProductId;

/// One rendered row, optionally tagged with the product it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub product_id: Option<ProductId>,
    pub markup: String,
}

/// An ordered list of rows that can be cleared, appended to, and patched
/// by product id.
pub trait RowContainer {
    /// Remove every row.
    fn clear(&mut self);

    /// Append a row at the end.
    fn push_row(&mut self, product_id: Option<ProductId>, markup: String);

    /// Replace the markup of the row tagged `product_id`.
    ///
    /// Returns `false` (and changes nothing) when no such row exists.
    fn replace_row(&mut self, product_id: ProductId, markup: String) -> bool;

    /// Rows in display order.
    fn rows(&self) -> &[Row];

    fn row(&self, product_id: ProductId) -> Option<&Row> {
        self.rows()
            .iter()
            .find(|row| row.product_id == Some(product_id))
    }

    fn has_row(&self, product_id: ProductId) -> bool {
        self.row(product_id).is_some()
    }
}

/// In-memory container of HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct HtmlRows {
    rows: Vec<Row>,
}

impl HtmlRows {
    /// Markup of every row, in order.
    pub fn markup(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.markup.as_str())
    }
}

impl RowContainer for HtmlRows {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn push_row(&mut self, product_id: Option<ProductId>, markup: String) {
        self.rows.push(Row { product_id, markup });
    }

    fn replace_row(&mut self, product_id: ProductId, markup: String) -> bool {
        match self
            .rows
            .iter_mut()
            .find(|row| row.product_id == Some(product_id))
        {
            Some(row) => {
                row.markup = markup;
                true
            }
            None => false,
        }
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_row_by_product_id() {
        let mut rows = HtmlRows::default();
        rows.push_row(Some(ProductId::new(1)), "<li>one</li>".to_string());
        rows.push_row(None, "<li>note</li>".to_string());

        assert!(rows.replace_row(ProductId::new(1), "<li>uno</li>".to_string()));
        assert!(!rows.replace_row(ProductId::new(2), "<li>dos</li>".to_string()));

        let markup: Vec<&str> = rows.markup().collect();
        assert_eq!(markup, vec!["<li>uno</li>", "<li>note</li>"]);
        assert!(rows.has_row(ProductId::new(1)));
        assert!(!rows.has_row(ProductId::new(2)));
    }

    #[test]
    fn test_clear_empties_container() {
        let mut rows = HtmlRows::default();
        rows.push_row(None, "<li></li>".to_string());
        rows.clear();
        assert!(rows.rows().is_empty());
    }
}
