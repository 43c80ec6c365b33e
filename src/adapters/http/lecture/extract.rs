//! Extractors that report malformed input as `VALIDATION_FAILED`.
//!
//! axum's own `Json` and `Query` reject with a plain-text body; these wrap
//! them so every 400 from the lecture endpoints carries an `ErrorResponse`.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use super::dto::ErrorResponse;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(malformed("body", rejection.body_text())),
        }
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(malformed("query", rejection.body_text())),
        }
    }
}

fn malformed(source: &str, reason: String) -> Response {
    tracing::debug!(source, reason = %reason, "Rejected malformed request");
    let mut error = ErrorResponse::bad_request(reason);
    error.details = Some(serde_json::json!({ "field": source }));
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}
