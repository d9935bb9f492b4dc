//! Event router: turns raw clicks into cart store calls.
//!
//! Views never call the store. They mark each control with a `data-action`
//! and each row with a `data-product-id`; the browser posts those two
//! attributes as an [`Interaction`], and the router decodes it into a typed
//! [`Intent`] and runs the matching store operation.

use dessert_cart_core::{CartAction, CartError, CartStore, ProductId};
use serde::Deserialize;
use tracing::debug;

/// A click as reported by the browser.
///
/// `action` comes from the clicked control, `product_id` from the nearest
/// enclosing row. Either may be missing when the click landed elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Interaction {
    pub action: Option<String>,
    pub product_id: Option<String>,
}

impl Interaction {
    #[must_use]
    pub fn new(action: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            product_id: Some(product_id.into()),
        }
    }

    /// Decode into an intent, or `None` when this is not a cart control.
    #[must_use]
    pub fn decode(&self) -> Option<Intent> {
        let action = self.action.as_deref()?.parse::<CartAction>().ok()?;
        let product_id = self.product_id.as_deref()?.parse::<ProductId>().ok()?;
        Some(Intent { action, product_id })
    }
}

/// A decoded cart intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub action: CartAction,
    pub product_id: ProductId,
}

/// What the router did with an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a cart control; nothing happened.
    Ignored,
    /// The intent was applied to the store.
    Applied(Intent),
}

/// Forwards decoded interactions to a [`CartStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRouter;

impl EventRouter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode `interaction` and apply it to `store`.
    ///
    /// Clicks without a known action name or a product id are ignored.
    ///
    /// # Errors
    ///
    /// Returns the store's [`CartError`] when the intent breaks its contract,
    /// e.g. incrementing a product that is no longer in the cart.
    pub fn dispatch(
        &self,
        store: &mut CartStore,
        interaction: &Interaction,
    ) -> Result<Dispatch, CartError> {
        let Some(intent) = interaction.decode() else {
            debug!(?interaction, "Ignoring interaction without a cart action");
            return Ok(Dispatch::Ignored);
        };

        store.apply(intent.action, intent.product_id)?;
        Ok(Dispatch::Applied(intent))
    }
}
