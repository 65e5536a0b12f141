//! Server runner: builds the router and serves until shutdown.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::RelayRepository;
use crate::infrastructure::repository::InMemoryRelayRepository;
use crate::ui::handler::{get_rooms, health_check, websocket_handler};
use crate::ui::signal::shutdown_signal;
use crate::ui::state::AppState;

/// Run the relay server with the given configuration until a shutdown
/// signal arrives.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let repository: Arc<dyn RelayRepository> =
        Arc::new(InMemoryRelayRepository::new(config.room_capacity));
    let state = Arc::new(AppState {
        repository,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        "Relay server listening on {} (room capacity {}, ping interval {:?})",
        listener.local_addr()?,
        config.room_capacity,
        config.ping_interval
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
