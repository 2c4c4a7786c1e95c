use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

/// Room for multipart boundaries and part headers on top of the file itself,
/// so oversized files are reported by the size check rather than the body limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;

    let mut router = Router::new()
        // Images
        .route("/images", get(handlers::list_images))
        .route("/images/:id", get(handlers::get_image))
        .route("/images/:id", delete(handlers::delete_image))
        .route(
            "/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        // Aggregates
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled, purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
