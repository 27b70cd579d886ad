//! cmdgate HTTP - JSON ingress surface
//!
//! - `POST /api/command` enqueues `{command, source?}`
//! - `GET /api/status` shows the queue without consuming it
//! - `POST /api/clear` empties the queue
//!
//! Every response uses the `{success, message}` envelope.

pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use cmdgate_engine::IngressGateway;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use errors::{ApiError, ApiResult};
pub use handlers::{ApiResponse, CommandRequest, StatusResponse};

#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: IngressGateway,
}

pub fn router(gateway: IngressGateway) -> Router {
    Router::new()
        .route("/api/command", post(handlers::submit_command))
        .route("/api/status", get(handlers::queue_status))
        .route("/api/clear", post(handlers::clear_queue))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway })
}

/// Serve the API on `listener` until `shutdown` resolves
///
/// # Errors
///
/// Returns the underlying I/O error if the server fails.
pub async fn serve<F>(listener: TcpListener, gateway: IngressGateway, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "HTTP API listening");
    }
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown)
        .await
}
