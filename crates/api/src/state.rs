use std::sync::Arc;

use crate::background_check::BackgroundCheckProvider;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fait_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (realtime clients).
    pub ws_manager: Arc<WsManager>,
    /// Domain event bus.
    pub event_bus: Arc<fait_events::EventBus>,
    /// Background-check integration; `None` when not configured.
    pub background_check: Option<Arc<dyn BackgroundCheckProvider>>,
}
