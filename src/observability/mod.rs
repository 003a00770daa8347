//! Observability subsystem.
//!
//! All subsystems emit structured `tracing` events; `logging.rs` installs the
//! subscriber that writes them to stdout. Config reloads log path, generation
//! and version so a change can be matched to the requests that follow it.

pub mod logging;

pub use logging::init_logging;
