//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the version handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ConfigStore;
use crate::http::request::MakeRequestUuidV4;
use crate::http::response::VersionResponse;

/// Upper bound on the time spent handling one request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
}

/// HTTP server exposing the current configuration.
pub struct HttpServer {
    router: Router,
    store: Arc<ConfigStore>,
}

impl HttpServer {
    /// Create a new HTTP server reading from `store`.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let state = AppState {
            store: Arc::clone(&store),
        };
        let router = Self::build_router(state);
        Self { router, store }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/version", get(version_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// A clone of the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The store requests are served from.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /version`: the version label of the current configuration.
async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    let config = state.store.current();
    Json(VersionResponse {
        version: config.version.clone(),
    })
}
