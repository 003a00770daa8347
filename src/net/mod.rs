//! Network layer.
//!
//! Binds the listen socket the HTTP server accepts on. The port comes from
//! the configuration published at startup; reloads do not rebind.

pub mod listener;

pub use listener::{bind, ListenerError};
