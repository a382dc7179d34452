//! Agent runtime server.
//!
//! Exposes exactly one [`Agent`](pit_agent::Agent) over JSON/HTTP. Each route
//! maps 1:1 onto an agent call; the server adds no game logic of its own.
//!
//! - **[`routes`]**: Route table and the single dispatch boundary.
//! - **[`state`]**: The agent instance, owned behind a lock.
//! - **[`config`]**: TOML configuration and CLI overrides.

use std::future::Future;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Full application: routes plus request tracing and permissive CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until `shutdown` resolves.
///
/// On shutdown the listener is closed first; requests already inside an
/// agent call run to completion on their blocking worker.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("serve http")
}
