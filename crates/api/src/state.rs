use std::sync::Arc;

use stockroom_core::media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockroom_db::DbPool,
    /// Server configuration (upload limits, media folder).
    pub config: Arc<ServerConfig>,
    /// External image host.
    pub media: Arc<dyn MediaStore>,
}
