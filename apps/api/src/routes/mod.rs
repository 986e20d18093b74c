pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::tailoring::handlers;

/// Uploaded resumes are small; anything above this is rejected before parsing.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/tailor", post(handlers::handle_tailor))
        .route(
            "/api/tailor-pdf",
            post(handlers::handle_tailor_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback_service(static_files)
        .with_state(state)
}
