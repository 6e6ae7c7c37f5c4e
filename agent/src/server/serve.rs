//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::AgentError;
use crate::server::handlers::{
    binary_sensors_handler, catgenie_device_handler, catgenie_operation_handler,
    catgenie_refresh_handler, catgenie_status_handler, health_handler, vacuum_command_handler,
    vacuum_fan_speed_handler, vacuum_handler, vacuum_pause_handler, vacuum_return_handler,
    vacuum_start_handler, version_handler,
};
use crate::server::state::ServerState;

/// Routes of the local host API
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Litter box
        .route("/catgenie/device", get(catgenie_device_handler))
        .route("/catgenie/status", get(catgenie_status_handler))
        .route("/catgenie/binary_sensors", get(binary_sensors_handler))
        .route("/catgenie/refresh", post(catgenie_refresh_handler))
        .route("/catgenie/operation", post(catgenie_operation_handler))
        // Vacuum
        .route("/vacuum", get(vacuum_handler))
        .route("/vacuum/start", post(vacuum_start_handler))
        .route("/vacuum/pause", post(vacuum_pause_handler))
        .route("/vacuum/return_to_base", post(vacuum_return_handler))
        .route("/vacuum/fan_speed", post(vacuum_fan_speed_handler))
        .route("/vacuum/command", post(vacuum_command_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), AgentError>>, AgentError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| AgentError::ServerError(e.to_string()))
    });

    Ok(handle)
}
