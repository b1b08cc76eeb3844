use std::sync::Arc;

use storehub_cloud::ObjectStore;
use storehub_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storehub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object storage for uploaded images.
    pub storage: Arc<dyn ObjectStore>,
    /// Event bus for order notifications.
    pub event_bus: Arc<EventBus>,
    /// Outbound HTTP client (reCAPTCHA verification).
    pub http: reqwest::Client,
}
