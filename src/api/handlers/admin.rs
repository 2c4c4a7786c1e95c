use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::Success;
use crate::store::StoreStats;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: String,
    /// Seconds since the application state was created
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub total_images: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub stored_bytes: u64,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub deleted: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = state.store.count();

    Json(HealthResponse {
        success: true,
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        memory: MemoryUsage {
            stored_bytes: state.store.stored_bytes(),
            records,
        },
        total_images: records,
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<Success<StoreStats>> {
    Success::json(state.store.stats())
}

pub async fn admin_purge(State(state): State<Arc<AppState>>) -> Json<Success<PurgeResponse>> {
    let deleted = state.store.purge();

    tracing::warn!(images = deleted, "Purged all images");

    Success::json(PurgeResponse { deleted })
}
