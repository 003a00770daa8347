//! OS signal handling.
//!
//! # Responsibilities
//! - SIGTERM/SIGINT → trigger graceful shutdown
//! - SIGHUP → request a config reload, not shutdown
//!
//! Uses Tokio's signal handling (async-safe).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::watcher::{ChangeKind, ConfigChange};
use crate::lifecycle::shutdown::Shutdown;

/// Spawn the signal listener. Ends after the first shutdown signal.
pub fn spawn_signal_handler(
    shutdown: Arc<Shutdown>,
    reload_tx: mpsc::UnboundedSender<ConfigChange>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_shutdown(reload_tx).await;
        tracing::info!("Termination signal received");
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn wait_for_shutdown(reload_tx: mpsc::UnboundedSender<ConfigChange>) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut hangup, mut terminate) = match (signal(SignalKind::hangup()), signal(SignalKind::terminate())) {
        (Ok(hangup), Ok(terminate)) => (hangup, terminate),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Failed to install unix signal handlers, falling back to Ctrl+C");
            ctrl_c().await;
            return;
        }
    };

    loop {
        tokio::select! {
            _ = hangup.recv() => {
                tracing::info!("SIGHUP received, requesting config reload");
                let _ = reload_tx.send(ConfigChange::new(ChangeKind::Requested));
            }
            _ = terminate.recv() => return,
            _ = ctrl_c() => return,
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_reload_tx: mpsc::UnboundedSender<ConfigChange>) {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
