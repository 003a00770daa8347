//! Hot-swappable configuration store.
//!
//! Holds the single published [`Config`] behind an [`ArcSwap`]. Readers take
//! an `Arc` snapshot without locking; the reload path decodes a complete new
//! value off to the side and publishes it with one pointer swap, so a reader
//! sees either the old value or the new one and never a mix.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::Config;

/// Result of a reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new value was published.
    Applied { generation: u64 },
    /// The file decoded to the value already published.
    Unchanged,
    /// The file could not be used; the previous value stays current.
    Retained,
}

/// Owner of the current configuration and the file it came from.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<Config>,
    /// Bumped on every publish, starting at 1 for the initial load.
    generation: AtomicU64,
    /// Serializes reloads so two decodes never race to publish.
    reload_lock: Mutex<()>,
}

impl ConfigStore {
    /// Read, decode and validate `path`, publishing the result as the
    /// initial configuration.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_config(&path)?;

        tracing::info!(
            path = %path.display(),
            port = config.port,
            version = %config.version,
            database.host = %config.database.host,
            database.name = %config.database.name,
            database.port = config.database.port,
            file_dir = %config.file_dir.display(),
            "Configuration loaded"
        );

        Ok(Self::with_config(path, config))
    }

    /// Build a store around an already decoded value.
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            current: ArcSwap::from_pointee(config),
            generation: AtomicU64::new(1),
            reload_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the published configuration.
    pub fn current(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Number of values published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file and publish it if it differs from the
    /// current value. On error nothing is published.
    pub fn reload(&self) -> Result<ReloadOutcome, ConfigError> {
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let next = load_config(&self.path)?;
        let previous = self.current.load_full();

        if *previous == next {
            tracing::debug!(path = %self.path.display(), "Config file changed but content is identical");
            return Ok(ReloadOutcome::Unchanged);
        }

        if previous.port != next.port {
            tracing::warn!(
                current_port = previous.port,
                new_port = next.port,
                "Listen port changed; the new port takes effect after restart"
            );
        }

        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            path = %self.path.display(),
            generation,
            version = %next.version,
            "Configuration reloaded"
        );

        Ok(ReloadOutcome::Applied { generation })
    }

    /// Like [`reload`](Self::reload), but a failure is logged and the
    /// previous configuration stays current.
    pub fn reload_or_retain(&self) -> ReloadOutcome {
        match self.reload() {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    generation = self.generation(),
                    "Failed to reload config. Keeping current configuration."
                );
                ReloadOutcome::Retained
            }
        }
    }
}
