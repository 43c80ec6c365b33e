//! HTTP routes for lecture endpoints.

use axum::{
    routing::get,
    Router,
};

use super::handlers::{list_registrations, list_sessions, register, LectureHandlers};

/// Creates the lecture router with all endpoints.
pub fn lecture_routes(handlers: LectureHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(register))
        .route("/registrations", get(list_registrations))
        .with_state(handlers)
}
