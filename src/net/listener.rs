//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind the configured port on all interfaces
//! - Report unusable ports and bind failures as one error type

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Port 0 would bind an ephemeral port nobody configured.
    #[error("invalid listen port {0}")]
    InvalidPort(u16),

    /// Failed to bind to address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind `0.0.0.0:<port>`.
pub async fn bind(port: u16) -> Result<TcpListener, ListenerError> {
    if port == 0 {
        return Err(ListenerError::InvalidPort(port));
    }

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;

    tracing::info!(address = %addr, "Listening for connections");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_zero_rejected() {
        assert!(matches!(bind(0).await, Err(ListenerError::InvalidPort(0))));
    }

    #[tokio::test]
    async fn test_port_in_use() {
        let occupied = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let err = bind(port).await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }), "got {err}");
    }
}
