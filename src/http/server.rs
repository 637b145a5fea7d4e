//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the `/_router` API and history fallback
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::config::ServerConfig;
use crate::http::handlers::{history_fallback, list_routes, resolve_route, AppState};
use crate::http::request::{make_span, request_id_header};
use crate::lifecycle::Shutdown;
use crate::navigation::Navigator;

/// History-mode development server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(navigator: Arc<Navigator>, shell: Arc<str>, config: &ServerConfig) -> Self {
        let state = AppState { navigator, shell };
        let router = build_router(state, Duration::from_secs(config.request_timeout_secs));
        Self { router }
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let x_request_id = request_id_header();

    Router::new()
        .route("/_router/routes", get(list_routes))
        .route("/_router/resolve", get(resolve_route))
        .route("/", get(history_fallback))
        .route("/{*path}", get(history_fallback))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_span)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
