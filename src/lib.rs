//! Version service library: a hot-reloading configuration store behind a
//! minimal HTTP API.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{Config, ConfigStore};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
