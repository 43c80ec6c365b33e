//! HTTP adapters - REST API implementations.
//!
//! - `/lectures` - schedule, registration, registration history
//! - `/health` - liveness

pub mod health;
pub mod lecture;

pub use lecture::{lecture_routes, LectureHandlers};

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Builds the application router with its middleware stack.
///
/// An empty `cors_origins` list allows any origin.
pub fn app_router(
    handlers: LectureHandlers,
    request_timeout: Duration,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .nest("/lectures", lecture_routes(handlers))
        .route("/health", get(health::health))
        // Applied in reverse order - last added runs first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
