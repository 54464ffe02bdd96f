pub mod health;
pub mod upload;
pub mod webhook;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Ceiling for the whole multipart body. The `file` field itself is cut off at
/// the resume limit while it streams in; hitting either limit yields the size message.
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Action server protocol
        .route("/actions", get(webhook::handle_list_actions))
        .route("/webhook", post(webhook::handle_webhook))
        // Direct upload
        .route(
            "/api/v1/sessions/:sender_id/resume",
            post(upload::handle_upload_resume)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .delete(upload::handle_clear_resume),
        )
        .with_state(state)
}
