use std::future::Future;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{handle_health, handle_test, handle_version};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
  Router::new()
    // Management routes.
    .route("/health", get(handle_health))
    .route("/version", get(handle_version))
    // Call tree execution.
    .route("/test", post(handle_test))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Serve the application on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
  F: Future<Output = ()> + Send + 'static,
{
  info!(addr = ?listener.local_addr().ok(), "callgraph listening");

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown)
    .await
}
