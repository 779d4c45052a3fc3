use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; each request builds its own evaluation context.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}
