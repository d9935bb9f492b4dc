//! Per-page cart sessions.
//!
//! Every page load opens a fresh session with an empty cart. The page embeds
//! the session id and sends it back with each click. Sessions are held in a
//! `moka` cache: one left idle for the configured timeout, or pushed out by
//! the capacity limit, is dropped, and dropping the last handle stops its
//! worker thread.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dessert_cart_core::Catalog;
use moka::future::Cache;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Page, SessionError, SessionHandle};
use crate::config::SessionConfig;

/// Identifies one page load's cart session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Opens and looks up cart sessions for one catalog.
///
/// Cheaply cloneable; clones share the same sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    sessions: Cache<SessionId, SessionHandle>,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("products", &self.catalog.len())
            .field("sessions", &self.sessions.entry_count())
            .finish()
    }
}

impl SessionRegistry {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_idle(config.idle_timeout)
            .build();

        Self { catalog, sessions }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Start a session with an empty cart and return its first page.
    ///
    /// # Errors
    ///
    /// Returns the error the session failed to start or render with.
    pub async fn open(&self) -> Result<(SessionId, Page), SessionError> {
        let handle = SessionHandle::spawn(Arc::clone(&self.catalog)).await?;
        let page = handle.page().await?;

        let id = SessionId::new();
        self.sessions.insert(id, handle).await;
        info!(session_id = %id, "Cart session opened");
        Ok((id, page))
    }

    /// Look up a live session, refreshing its idle timer.
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        let handle = self.sessions.get(&id).await;
        if handle.is_none() {
            debug!(session_id = %id, "Unknown or expired cart session");
        }
        handle
    }
}
