//! Interaction handler.
//!
//! The browser script posts `session_id`, `action` and `product_id` (the
//! last two optional) for every click inside the product list or cart
//! summary. The answer carries the product rows the interaction re-rendered
//! and the new cart summary, which the script swaps into the page.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::router::Interaction;
use crate::session::{Patch, SessionId};
use crate::state::{AppState, Storefront};

/// Form fields posted by the click script.
#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub session_id: Option<String>,
    pub action: Option<String>,
    pub product_id: Option<String>,
}

impl InteractionForm {
    fn session_id(&self) -> Option<SessionId> {
        self.session_id.as_deref()?.parse().ok()
    }
}

impl From<InteractionForm> for Interaction {
    fn from(form: InteractionForm) -> Self {
        Self {
            action: form.action,
            product_id: form.product_id,
        }
    }
}

/// Apply a click to the page's cart.
///
/// A missing, malformed or expired session id answers `410 Gone`.
#[instrument(skip(state))]
pub async fn interact(
    State(state): State<AppState>,
    Form(form): Form<InteractionForm>,
) -> Result<Json<Patch>> {
    let sessions = match state.storefront() {
        Storefront::Ready(sessions) => sessions,
        Storefront::Unavailable { reason } => return Err(AppError::Unavailable(reason.clone())),
    };

    let session_id = form.session_id().ok_or(AppError::SessionExpired)?;
    let session = sessions
        .get(session_id)
        .await
        .ok_or(AppError::SessionExpired)?;

    Ok(Json(session.interact(form.into()).await?))
}
