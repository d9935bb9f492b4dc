//! Server-rendered views of the catalog and the cart.
//!
//! Both views write HTML fragments into a [`RowContainer`] and subscribe to
//! the cart store. The product list patches single rows; the cart summary
//! is rebuilt in full.

pub mod cart_summary;
pub mod container;
pub mod product_list;

pub use cart_summary::CartSummaryView;
pub use container::{HtmlRows, Row, RowContainer};
pub use product_list::ProductListView;

#[cfg(test)]
pub(crate) fn test_catalog() -> std::sync::Arc<dessert_cart_core::Catalog> {
    let json = r#"[
        {
            "id": 1,
            "image": {
                "thumbnail": "/static/images/image-waffle-thumbnail.svg",
                "mobile": "/static/images/image-waffle-mobile.svg",
                "tablet": "/static/images/image-waffle-tablet.svg",
                "desktop": "/static/images/image-waffle-desktop.svg"
            },
            "name": "Waffle with Berries",
            "category": "Waffle",
            "price": 6.5
        },
        {
            "id": 2,
            "image": {
                "thumbnail": "/static/images/image-brownie-thumbnail.svg",
                "mobile": "/static/images/image-brownie-mobile.svg",
                "tablet": "/static/images/image-brownie-tablet.svg",
                "desktop": "/static/images/image-brownie-desktop.svg"
            },
            "name": "Salted Caramel Brownie",
            "category": "Brownie",
            "price": 4.5
        }
    ]"#;
    let products: Vec<dessert_cart_core::Product> =
        serde_json::from_str(json).expect("test catalog parses");
    std::sync::Arc::new(dessert_cart_core::Catalog::new(products))
}
