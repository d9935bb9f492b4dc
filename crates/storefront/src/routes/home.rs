//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::state::{AppState, Storefront};

/// Full storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub session_id: String,
    pub product_rows: Vec<String>,
    pub cart_summary: String,
}

/// Shown instead of the product list when the catalog failed to load.
///
/// The failure detail stays in the logs.
#[derive(Template, WebTemplate)]
#[template(path = "catalog_unavailable.html")]
pub struct CatalogUnavailableTemplate;

/// Display the product list and an empty cart summary.
///
/// Every request opens a new cart session, so each page load starts with an
/// empty cart. Answers `503 Service Unavailable` with an error page when the
/// catalog could not be loaded at startup.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Response> {
    match state.storefront() {
        Storefront::Ready(sessions) => {
            let (session_id, page) = sessions.open().await?;
            Ok(IndexTemplate {
                session_id: session_id.to_string(),
                product_rows: page.product_rows,
                cart_summary: page.cart_summary,
            }
            .into_response())
        }
        Storefront::Unavailable { .. } => {
            Ok((StatusCode::SERVICE_UNAVAILABLE, CatalogUnavailableTemplate).into_response())
        }
    }
}
