//! Startup orchestration.
//!
//! # Phases
//! ```text
//! Starting → Loaded → Serving
//! Starting → Failed            (initial load, watcher or bind failure)
//! Serving  → Serving           (every reload, successful or not)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is left running
//! - Config first, then watcher, then routes, listener last
//! - The listen port is read once; reloads never rebind

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::watcher::{spawn_reloader, ConfigChange, ConfigWatcher};
use crate::config::{ConfigError, ConfigStore};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::net::{self, ListenerError};

/// Process lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Loaded,
    Serving,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::Loaded => "loaded",
            Phase::Serving => "serving",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that abort the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Bind(#[from] ListenerError),

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A loaded, watched and bound service that has not started serving yet.
pub struct Service {
    server: HttpServer,
    listener: TcpListener,
    reload_tx: mpsc::UnboundedSender<ConfigChange>,
    watcher: RecommendedWatcher,
    reloader: JoinHandle<()>,
    phase: Phase,
}

impl Service {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        self.server.store()
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle for requesting a reload outside of file events.
    pub fn reload_sender(&self) -> mpsc::UnboundedSender<ConfigChange> {
        self.reload_tx.clone()
    }

    /// Serve until `shutdown` fires. Reload failures never end this.
    pub async fn serve(mut self, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        self.phase = Phase::Serving;
        tracing::info!(phase = %self.phase, "Service ready");

        let result = self.server.run(self.listener, shutdown).await;

        drop(self.watcher);
        self.reloader.abort();

        result.map_err(StartupError::Serve)
    }
}

/// Load the config, start watching it, register routes and bind the port.
pub async fn start(config_path: &Path) -> Result<Service, StartupError> {
    tracing::info!(phase = %Phase::Starting, path = %config_path.display(), "Starting");

    match start_inner(config_path).await {
        Ok(service) => Ok(service),
        Err(e) => {
            tracing::error!(phase = %Phase::Failed, error = %e, "Startup failed");
            Err(e)
        }
    }
}

async fn start_inner(config_path: &Path) -> Result<Service, StartupError> {
    let store = Arc::new(ConfigStore::load(config_path)?);
    tracing::info!(phase = %Phase::Loaded, "Initial configuration published");

    let (watcher, changes) = ConfigWatcher::new(store.path());
    let reload_tx = watcher.sender();
    let watcher = watcher.run()?;

    let server = HttpServer::new(Arc::clone(&store));
    let listener = net::bind(store.current().port).await?;

    let reloader = spawn_reloader(Arc::clone(&store), changes);

    Ok(Service {
        server,
        listener,
        reload_tx,
        watcher,
        reloader,
        phase: Phase::Loaded,
    })
}

/// Full process lifecycle: start, install signal handlers, serve.
pub async fn run(config_path: &Path) -> Result<(), StartupError> {
    let service = start(config_path).await?;

    // Subscribed before the handler starts so an early signal stays buffered.
    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    spawn_signal_handler(Arc::clone(&shutdown), service.reload_sender());

    service.serve(shutdown_rx).await
}
