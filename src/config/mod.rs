//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML/JSON)
//!     → loader.rs (parse & deserialize, coerce.rs for loose scalars)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → store.rs publishes it as Arc<Config>
//!
//! On change:
//!     watcher.rs detects change
//!     → reloader task calls store.rs
//!     → loader.rs loads and validates new config
//!     → atomic swap of Arc<Config>, or keep the old one on error
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Every field has a default so minimal files decode
//! - Validation separates syntactic (serde) from semantic checks

pub mod coerce;
pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat};
pub use schema::{Config, DatabaseConfig};
pub use store::{ConfigStore, ReloadOutcome};
pub use validation::ValidationError;
pub use watcher::{spawn_reloader, ChangeKind, ConfigChange, ConfigWatcher};
