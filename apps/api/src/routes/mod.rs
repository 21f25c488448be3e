pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_submit_message),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            get(handlers::handle_get_summary),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        .with_state(state)
}
