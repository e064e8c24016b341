pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews", post(handlers::handle_start))
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/interviews/:id/responses",
            post(handlers::handle_respond),
        )
        .route(
            "/api/v1/interviews/:id/continue",
            post(handlers::handle_continue),
        )
        .route("/api/v1/interviews/:id/end", post(handlers::handle_end))
        .route(
            "/api/v1/interviews/:id/summary",
            get(handlers::handle_download_summary),
        )
        .with_state(state)
}
