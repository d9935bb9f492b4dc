//! The cart session: one store, both views and the router.
//!
//! A [`Session`] is single-threaded. Views are shared with the store's
//! observers through `Rc<RefCell<_>>`, so the session lives on one thread
//! for its whole life; [`SessionHandle`] runs it on a dedicated worker
//! thread and hands interactions to it one at a time. Each page load gets
//! its own session from the [`SessionRegistry`].

mod registry;
mod worker;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dessert_cart_core::{CartError, CartStore, Catalog, ProductId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::router::{Dispatch, EventRouter, Interaction};
use crate::views::{CartSummaryView, HtmlRows, ProductListView};

pub use registry::{SessionId, SessionRegistry};
pub use worker::SessionHandle;

/// Errors raised while running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The interaction broke the cart store's contract.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The worker thread could not be started.
    #[error("Failed to start session worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread has stopped.
    #[error("Session worker is not running")]
    Closed,
}

/// Everything needed to render the full page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub product_rows: Vec<String>,
    pub cart_summary: String,
}

/// Whether an interaction changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchStatus {
    Applied,
    Ignored,
}

/// A re-rendered product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowPatch {
    pub product_id: ProductId,
    pub html: String,
}

/// The page fragments an interaction changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub status: PatchStatus,
    pub rows: Vec<RowPatch>,
    pub summary: String,
}

/// One shopper's cart and the views bound to it.
pub struct Session {
    store: CartStore,
    router: EventRouter,
    product_list: Rc<RefCell<ProductListView<HtmlRows>>>,
    cart_summary: Rc<RefCell<CartSummaryView<HtmlRows>>>,
}

impl Session {
    /// Build the store and views, render both views and wire them to the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Render`] if the initial render fails.
    #[instrument(skip_all, fields(products = catalog.len()))]
    pub fn start(catalog: Arc<Catalog>) -> Result<Self, SessionError> {
        let mut store = CartStore::new(Arc::clone(&catalog));

        let mut product_list = ProductListView::new(Arc::clone(&catalog), HtmlRows::default());
        product_list.render(store.snapshot())?;
        let mut cart_summary = CartSummaryView::new(catalog, HtmlRows::default());
        cart_summary.render(store.snapshot())?;

        let product_list = Rc::new(RefCell::new(product_list));
        let cart_summary = Rc::new(RefCell::new(cart_summary));

        {
            let view = Rc::clone(&product_list);
            store.subscribe(move |change, cart| view.borrow_mut().on_cart_change(change, cart));
        }
        {
            let view = Rc::clone(&cart_summary);
            store.subscribe(move |change, cart| view.borrow_mut().on_cart_change(change, cart));
        }

        info!("Cart session started");
        Ok(Self {
            store,
            router: EventRouter::new(),
            product_list,
            cart_summary,
        })
    }

    /// The currently rendered product rows and cart summary.
    #[must_use]
    pub fn page(&self) -> Page {
        let product_rows = self
            .product_list
            .borrow()
            .container()
            .markup()
            .map(str::to_string)
            .collect();

        Page {
            product_rows,
            cart_summary: self.cart_summary.borrow().markup().to_string(),
        }
    }

    /// Route one interaction and collect the fragments it changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cart`] when the interaction breaks the store's
    /// contract; the cart and views are unchanged in that case.
    #[instrument(skip(self))]
    pub fn handle(&mut self, interaction: &Interaction) -> Result<Patch, SessionError> {
        let status = match self.router.dispatch(&mut self.store, interaction)? {
            Dispatch::Applied(_) => PatchStatus::Applied,
            Dispatch::Ignored => PatchStatus::Ignored,
        };

        let mut product_list = self.product_list.borrow_mut();
        let rows = product_list
            .take_updated()
            .into_iter()
            .filter_map(|product_id| {
                product_list.row_markup(product_id).map(|html| RowPatch {
                    product_id,
                    html: html.to_string(),
                })
            })
            .collect();

        Ok(Patch {
            status,
            rows,
            summary: self.cart_summary.borrow().markup().to_string(),
        })
    }

    /// Read-only access to the cart store.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }
}
