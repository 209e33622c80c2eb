use std::sync::Arc;

use crate::config::ServerConfig;
use crate::upload::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk storage for uploaded photos.
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(pool: campus_db::DbPool, config: ServerConfig) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);
        Self {
            pool,
            config: Arc::new(config),
            uploads: Arc::new(uploads),
        }
    }
}
