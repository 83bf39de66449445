//! Router assembly and server lifecycle.
//!
//! Shared state is constructed once at startup and injected into every
//! handler; nothing is mutated after init. The sensitive route group is
//! gated by the configured allow-list, the public read group admits any
//! origin, and the health endpoint is ungated.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::admin_routes;
use super::submission_routes;
use crate::config::Config;
use crate::cors::{origin_gate, OriginPolicy};
use crate::submissions::SubmissionStore;

/// Shared handler state
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub master_password: Option<String>,
}

/// Build the full application router
pub fn build_router(config: &Config, store: Arc<dyn SubmissionStore>) -> Router {
    let state = Arc::new(AppState {
        store,
        master_password: config.master_password.clone(),
    });

    let allow_list = OriginPolicy::allow_list(config.allowed_origins.clone());

    let sensitive = Router::new()
        .merge(submission_routes::routes(&allow_list))
        .merge(admin_routes::routes(&allow_list))
        .layer(middleware::from_fn_with_state(
            allow_list.clone(),
            origin_gate,
        ));

    let public = submission_routes::public_routes(&OriginPolicy::Any).layer(
        middleware::from_fn_with_state(OriginPolicy::Any, origin_gate),
    );

    Router::new()
        .route("/health", get(health_handler))
        .merge(sensitive)
        .merge(public)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// HTTP server bound to one address
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    pub fn new(config: &Config, addr: SocketAddr, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            addr,
            router: build_router(config, store),
        }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until SIGINT or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("listening on {}", self.addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
