//! Runs a [`Session`] on its own thread.
//!
//! Handlers talk to the session through a bounded channel; each command runs
//! to completion before the next one is taken, so cart mutations and view
//! updates never interleave.

use std::sync::Arc;

use dessert_cart_core::Catalog;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use super::{Page, Patch, Session, SessionError};
use crate::router::Interaction;

const WORKER_THREAD_NAME: &str = "cart-session";
const COMMAND_BUFFER: usize = 64;

enum Command {
    Page(oneshot::Sender<Page>),
    Interact(Interaction, oneshot::Sender<Result<Patch, SessionError>>),
}

/// Cloneable handle to a session running on a worker thread.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(_) => f.write_str("Page"),
            Self::Interact(interaction, _) => f.debug_tuple("Interact").field(interaction).finish(),
        }
    }
}

impl SessionHandle {
    /// Start a session for `catalog` on a dedicated thread.
    ///
    /// Resolves once the session has rendered its initial page.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Spawn`] if the thread cannot be created, or the
    /// error [`Session::start`] failed with.
    pub async fn spawn(catalog: Arc<Catalog>) -> Result<Self, SessionError> {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(catalog, receiver, ready_tx))
            .map_err(SessionError::Spawn)?;

        ready_rx.await.map_err(|_| SessionError::Closed)??;
        Ok(Self { commands })
    }

    /// Fetch the currently rendered page.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the worker has stopped.
    pub async fn page(&self) -> Result<Page, SessionError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Page(reply)).await?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Hand an interaction to the session and wait for its patch.
    ///
    /// # Errors
    ///
    /// Returns the session's error for this interaction, or
    /// [`SessionError::Closed`] if the worker has stopped.
    pub async fn interact(&self, interaction: Interaction) -> Result<Patch, SessionError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Interact(interaction, reply)).await?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Worker thread body. Exits when every handle has been dropped.
fn run(
    catalog: Arc<Catalog>,
    mut commands: mpsc::Receiver<Command>,
    ready: oneshot::Sender<Result<(), SessionError>>,
) {
    let mut session = match Session::start(catalog) {
        Ok(session) => {
            let _ = ready.send(Ok(()));
            session
        }
        Err(e) => {
            error!(error = %e, "Cart session failed to start");
            let _ = ready.send(Err(e));
            return;
        }
    };

    while let Some(command) = commands.blocking_recv() {
        match command {
            Command::Page(reply) => {
                let _ = reply.send(session.page());
            }
            Command::Interact(interaction, reply) => {
                let _ = reply.send(session.handle(&interaction));
            }
        }
    }

    info!("Cart session stopped");
}
