pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

/// Headroom over the file limit for multipart framing and the job description.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(handlers::handle_upload).get(handlers::handle_list),
        )
        .route(
            "/api/v1/resumes/consistency",
            get(handlers::handle_consistency),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .route("/api/v1/resumes/:id/file", get(handlers::handle_get_file))
        .route("/api/v1/resumes/:id/match", post(handlers::handle_match))
        // Extraction only
        .route("/api/v1/extract", post(handlers::handle_extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
