//! Dessert Cart Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Flow
//!
//! 1. [`catalog::CatalogLoader`] reads the product list once at startup.
//! 2. [`session::SessionHandle`] starts a [`session::Session`] on its own
//!    thread: a cart store plus the product list and cart summary views.
//! 3. The browser posts every click as an [`router::Interaction`]; the
//!    [`router::EventRouter`] turns it into a cart store call.
//! 4. The store notifies both views, and the re-rendered fragments go back
//!    to the browser.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with its state attached.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running, even when the catalog failed to
/// load.
async fn health() -> &'static str {
    "ok"
}
