//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product list + cart summary (503 error page if the catalog failed)
//! POST /interactions           - Apply a click (form: session_id, action, product_id); returns JSON patch
//! GET  /health                 - Health check
//! GET  /static/*               - Stylesheet, click script, bundled catalog
//! ```

pub mod home;
pub mod interactions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/interactions", post(interactions::interact))
}
