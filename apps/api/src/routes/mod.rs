pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

/// Largest accepted resume upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route(
            "/process_resume",
            post(handlers::handle_process_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/decide", post(handlers::handle_decide))
        .route("/notify", post(handlers::handle_notify))
        .with_state(state)
}
