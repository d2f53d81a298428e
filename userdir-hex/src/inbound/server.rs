//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use userdir_types::AccountStore;

use super::handlers::{self, AppState};
use crate::DirectoryService;

/// HTTP Server for the user directory API.
pub struct HttpServer<S: AccountStore> {
    state: Arc<AppState<S>>,
}

impl<S: AccountStore> HttpServer<S> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: DirectoryService<S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/users", post(handlers::create_user::<S>))
            .route("/api/users", get(handlers::list_users::<S>))
            .route("/api/users/{id}", get(handlers::get_user::<S>))
            .route("/api/users/{id}", put(handlers::update_user::<S>))
            .route("/api/users/{id}", delete(handlers::delete_user::<S>))
            .route("/api/users/payment", post(handlers::transfer::<S>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
