//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::session::SessionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The cart session failed or rejected the interaction.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The catalog never loaded.
    #[error("Storefront unavailable: {0}")]
    Unavailable(String),

    /// The page's cart session is unknown or has been idle too long.
    #[error("Cart session expired")]
    SessionExpired,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            // A stale page asked for a change the cart can no longer make.
            Self::Session(SessionError::Cart(_)) => StatusCode::CONFLICT,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SessionExpired => StatusCode::GONE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Rejected interaction");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(SessionError::Cart(err)) => err.to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            Self::Unavailable(_) => "Catalog unavailable".to_string(),
            Self::SessionExpired => "Cart session expired, reload the page".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
