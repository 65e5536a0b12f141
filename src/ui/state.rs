//! Shared server state handed to the axum handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::domain::RelayRepository;

/// Shared application state
///
/// Built once at server start; never a process-wide singleton. Connection
/// handlers reach the registry and room directory exclusively through the
/// repository.
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RelayRepository>,
    /// Runtime configuration (heartbeat interval, capacities)
    pub config: ServerConfig,
}
