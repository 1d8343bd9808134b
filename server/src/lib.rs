//! HTTP service exposing CRUD over todo items stored in SQLite.
//!
//! # Design
//! - The pool lives in `AppState` and is injected into handlers through
//!   axum's `State`, so the router can be built against any store,
//!   including an in-memory one in tests.
//! - Handlers return `Result<_, ApiError>`; every failure renders as
//!   `{"detail": "..."}`.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use db::TodoRepo;
pub use error::{ApiError, DbError};
pub use models::{Todo, TodoCreate, TodoUpdate};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub todos: TodoRepo,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            todos: TodoRepo::new(pool),
        }
    }
}

pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Connect to the configured store, create the schema and serve until
/// Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let pool = db::connect(&config.database_url).await?;
    tracing::info!(database_url = %config.database_url, "database ready");

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);

    run(listener, AppState::new(pool)).await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
