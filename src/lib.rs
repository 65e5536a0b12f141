//! Room-based relay server library.
//!
//! Clients connect over a persistent WebSocket channel, join named rooms and
//! exchange text and audio-chunk payloads that are fanned out to the other
//! room members. Payloads are relayed opaquely; the server never decodes
//! audio.

pub mod common;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

pub use config::ServerConfig;

/// Run the relay server with configuration taken from the environment.
pub async fn run_server() -> std::io::Result<()> {
    ui::run(ServerConfig::from_env()).await
}
