//! Liveness report for `/api/health`.
//!
//! The service is `ok` when both the database and the photo directory are
//! usable and `degraded` otherwise. The endpoint always answers 200.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub uploads_healthy: bool,
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = campus_db::health_check(&state.pool).await.is_ok();
    let uploads_healthy = state.uploads.is_available().await;
    if !db_healthy || !uploads_healthy {
        tracing::warn!(db_healthy, uploads_healthy, "Health check degraded");
    }

    Json(HealthReport {
        status: if db_healthy && uploads_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        uploads_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
