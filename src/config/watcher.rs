//! Configuration file watcher for hot reload.
//!
//! The notifier callback only classifies events and forwards them on a
//! channel. A single task drains that channel and is the only caller of
//! [`ConfigStore::reload_or_retain`], which keeps one writer for the store.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::store::ConfigStore;

/// Quiet period used to coalesce the burst of events a single save produces.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// What happened to the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    /// Reload asked for explicitly (SIGHUP), not by the file system.
    Requested,
}

/// A change notification for the watched config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    pub kind: ChangeKind,
}

impl ConfigChange {
    pub fn new(kind: ChangeKind) -> Self {
        Self { kind }
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    change_tx: mpsc::UnboundedSender<ConfigChange>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for change notifications.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ConfigChange>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                change_tx,
            },
            change_rx,
        )
    }

    /// Another handle onto the change channel, for reloads that do not come
    /// from the file system.
    pub fn sender(&self) -> mpsc::UnboundedSender<ConfigChange> {
        self.change_tx.clone()
    }

    /// Start watching. The returned watcher must be kept alive for events to
    /// keep flowing.
    ///
    /// The parent directory is watched rather than the file itself so that
    /// editors which save by writing a new file and renaming it over the old
    /// one are still picked up.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name: OsString = self
            .path
            .file_name()
            .ok_or_else(|| notify::Error::path_not_found().add_path(self.path.clone()))?
            .to_owned();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = dir.canonicalize().map_err(notify::Error::io)?;

        let tx = self.change_tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let Some(kind) = classify(&event.kind) else {
                        return;
                    };
                    if event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str())) {
                        tracing::debug!(kind = ?kind, "Config file change detected");
                        let _ = tx.send(ConfigChange::new(kind));
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        _ => None,
    }
}

/// Spawn the single consumer that turns change notifications into reloads.
///
/// Events arriving within [`DEBOUNCE`] of each other are handled as one.
/// The task ends when every sender has been dropped.
pub fn spawn_reloader(
    store: Arc<ConfigStore>,
    mut changes: mpsc::UnboundedReceiver<ConfigChange>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(first) = changes.recv().await {
            tokio::time::sleep(DEBOUNCE).await;

            let mut last = first;
            while let Ok(next) = changes.try_recv() {
                last = next;
            }

            if last.kind == ChangeKind::Removed && !store.path().exists() {
                tracing::warn!(
                    path = %store.path().display(),
                    "Config file removed. Keeping current configuration."
                );
                continue;
            }

            tracing::info!(kind = ?last.kind, "Reloading configuration");
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.reload_or_retain()).await {
                Ok(outcome) => tracing::debug!(outcome = ?outcome, "Reload finished"),
                Err(e) => tracing::error!(error = %e, "Reload task failed"),
            }
        }

        tracing::debug!("Config change channel closed, reloader exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::fs;

    #[test]
    fn test_classify_event_kinds() {
        assert_eq!(classify(&EventKind::Create(CreateKind::File)), Some(ChangeKind::Created));
        assert_eq!(classify(&EventKind::Modify(ModifyKind::Any)), Some(ChangeKind::Modified));
        assert_eq!(classify(&EventKind::Remove(RemoveKind::File)), Some(ChangeKind::Removed));
        assert_eq!(classify(&EventKind::Access(notify::event::AccessKind::Any)), None);
    }

    #[tokio::test]
    async fn test_reloader_coalesces_and_applies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "port: 8080\nversion: \"1.0\"\n").unwrap();
        let store = Arc::new(ConfigStore::load(&path).unwrap());

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_reloader(Arc::clone(&store), rx);

        fs::write(&path, "port: 8080\nversion: \"1.1\"\n").unwrap();
        for _ in 0..5 {
            tx.send(ConfigChange::new(ChangeKind::Modified)).unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.current().version, "1.1");
        assert_eq!(store.generation(), 2);
    }

    #[tokio::test]
    async fn test_reloader_keeps_config_when_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "port: 8080\nversion: \"1.0\"\n").unwrap();
        let store = Arc::new(ConfigStore::load(&path).unwrap());

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_reloader(Arc::clone(&store), rx);

        fs::remove_file(&path).unwrap();
        tx.send(ConfigChange::new(ChangeKind::Removed)).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.current().version, "1.0");
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test]
    async fn test_requested_reload_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "port: 8080\nversion: \"1.0\"\n").unwrap();
        let store = Arc::new(ConfigStore::load(&path).unwrap());

        let (watcher, rx) = ConfigWatcher::new(&path);
        let tx = watcher.sender();
        drop(watcher);
        let handle = spawn_reloader(Arc::clone(&store), rx);

        fs::write(&path, "port: 8080\nversion: \"1.5\"\n").unwrap();
        tx.send(ConfigChange::new(ChangeKind::Requested)).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.current().version, "1.5");
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_run_rejects_path_without_file_name() {
        let (watcher, _rx) = ConfigWatcher::new(Path::new("/"));
        assert!(watcher.run().is_err());
    }
}
