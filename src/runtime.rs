//! Application runtime
//!
//! The single logical thread of control. [`App`] owns the [`Store`] and applies
//! commands from one unbounded channel strictly in arrival order. UI surfaces and
//! finished external calls submit through cloned [`AppHandle`]s.

use crate::error::{ApiError, StoreError};
use crate::router::{resolve, FragmentRouter, View};
use crate::store::{Operation, Published, Store};
use crate::tree::{SnapshotSource, StateTree};
use crate::views::{DerivedViews, ViewsConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Notices kept before the oldest are dropped.
pub const NOTICE_CAPACITY: usize = 256;

/// Unit of work for the main loop.
#[derive(Debug, Clone)]
pub enum Command {
    Apply(Operation),
    /// An external call failed; surfaced to the user, the tree stays as it is.
    Failed { origin: String, error: String },
    Shutdown,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub origin: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Clonable submitter of commands.
#[derive(Debug, Clone)]
pub struct AppHandle {
    sender: mpsc::UnboundedSender<Command>,
}

impl AppHandle {
    pub fn submit(&self, command: Command) -> Result<(), ApiError> {
        self.sender
            .send(command)
            .map_err(|_| ApiError::NotReady("application loop has stopped".to_string()))
    }

    pub fn apply(&self, operation: Operation) -> Result<(), ApiError> {
        self.submit(Command::Apply(operation))
    }

    pub fn shutdown(&self) -> Result<(), ApiError> {
        self.submit(Command::Shutdown)
    }
}

/// Outcome of booting from a snapshot.
pub enum Shell {
    Ready(App),
    NotReady { reason: String },
}

impl Shell {
    pub fn is_ready(&self) -> bool {
        matches!(self, Shell::Ready(_))
    }

    pub fn into_app(self) -> Result<App, ApiError> {
        match self {
            Shell::Ready(app) => Ok(app),
            Shell::NotReady { reason } => Err(ApiError::NotReady(reason)),
        }
    }
}

pub struct App {
    store: Store,
    views: DerivedViews,
    router: FragmentRouter,
    sender: mpsc::UnboundedSender<Command>,
    receiver: mpsc::UnboundedReceiver<Command>,
    notices: Vec<Notice>,
}

impl App {
    pub fn new(tree: StateTree, views: ViewsConfig, router: FragmentRouter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            store: Store::new(tree),
            views: DerivedViews::new(views),
            router,
            sender,
            receiver,
            notices: Vec::new(),
        }
    }

    /// Load the initial tree once. Any load failure leaves the shell not ready; there
    /// is no retry.
    pub async fn boot(
        source: &dyn SnapshotSource,
        views: ViewsConfig,
        router: FragmentRouter,
    ) -> Shell {
        match source.load().await {
            Ok(tree) => Shell::Ready(App::new(tree, views, router)),
            Err(e) => {
                error!(source = %source.describe(), error = %e, "Initial load failed");
                Shell::NotReady {
                    reason: format!("{}: {}", source.describe(), e),
                }
            }
        }
    }

    pub fn handle(&self) -> AppHandle {
        AppHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn tree(&self) -> Arc<StateTree> {
        self.store.tree()
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.store.subscribe()
    }

    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    pub fn router(&self) -> &FragmentRouter {
        &self.router
    }

    /// Notices not yet taken, oldest first. At most [`NOTICE_CAPACITY`].
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the pending notices to the caller, leaving none behind.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Resolve the visible screen for `fragment` against the latest tree.
    pub fn route(&self, fragment: &str) -> View {
        resolve(self.router.parse(fragment), &self.tree())
    }

    /// Apply an operation synchronously, for callers already on the main loop.
    pub fn dispatch(&self, operation: Operation) -> Result<Published, StoreError> {
        self.store.apply(operation)
    }

    /// Handle one command. Returns false on shutdown.
    pub fn process(&mut self, command: Command) -> bool {
        match command {
            Command::Apply(operation) => {
                let kind = operation.kind();
                if let Err(e) = self.store.apply(operation) {
                    warn!(op = kind, error = %e, "Operation rejected");
                    self.surface(kind, e.to_string());
                }
                true
            }
            Command::Failed { origin, error } => {
                self.surface(&origin, error);
                true
            }
            Command::Shutdown => false,
        }
    }

    fn surface(&mut self, origin: &str, message: String) {
        info!(origin, message = %message, "Notice surfaced");
        if self.notices.len() >= NOTICE_CAPACITY {
            let dropped = self.notices.len() + 1 - NOTICE_CAPACITY;
            self.notices.drain(..dropped);
            debug!(dropped, "Oldest notices dropped");
        }
        self.notices.push(Notice {
            origin: origin.to_string(),
            message,
            at: Utc::now(),
        });
    }

    /// Process every command already queued. Returns the number processed.
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(command) = self.receiver.try_recv() {
            processed += 1;
            if !self.process(command) {
                break;
            }
        }
        processed
    }

    /// Main loop: process commands until a shutdown command arrives, then hand the
    /// app back.
    pub async fn run(mut self) -> Self {
        info!(version = self.store.version(), "Main loop started");
        while let Some(command) = self.receiver.recv().await {
            if !self.process(command) {
                break;
            }
        }
        debug!(version = self.store.version(), "Main loop stopped");
        self
    }
}
