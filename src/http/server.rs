//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, metadata decoding)
//! - Bind server to listener
//! - Swap in reloaded configuration without restarting
//! - Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers;
use crate::http::middleware::metadata_middleware;
use crate::metadata::MetadataCodec;

/// Everything a request needs, swapped as a whole on reload.
pub struct InnerState {
    pub config: RelayConfig,
    pub codec: MetadataCodec,
}

impl InnerState {
    pub fn new(config: RelayConfig) -> Self {
        let codec = MetadataCodec::new(config.metadata.clone());
        Self { config, codec }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(InnerState::new(config))),
        }
    }

    /// Replace the configuration used by subsequent requests.
    pub fn reload(&self, config: RelayConfig) {
        let current = self.inner.load();
        if current.config.listener.bind_address != config.listener.bind_address {
            tracing::warn!(
                current = %current.config.listener.bind_address,
                requested = %config.listener.bind_address,
                "Bind address changes require a restart"
            );
        }
        if current.config.timeouts.request_secs != config.timeouts.request_secs {
            tracing::warn!("Request timeout changes require a restart");
        }
        self.inner.store(Arc::new(InnerState::new(config)));
        tracing::info!("Configuration reloaded");
    }
}

/// HTTP server exposing the decoded metadata of each request.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let state = AppState::new(config);
        let router = Self::build_router(state.clone(), request_timeout);
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/inspect", any(handlers::inspect))
            .route("/inspect/{*path}", any(handlers::inspect))
            .layer(middleware::from_fn_with_state(state.clone(), metadata_middleware))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        let request_id = req
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %req.method(),
                            path = %req.uri().path(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(TimeoutLayer::new(request_timeout))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, applying configs received on
    /// `config_updates` as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                state.reload(config);
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
