//! HTTP handlers for lecture endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AdmissionController, ListSessionsHandler, ListSessionsQuery, ListUserRegistrationsHandler,
    ListUserRegistrationsQuery, RegisterForSessionCommand, RegisterForSessionHandler,
};
use crate::domain::lecture::RegistrationError;
use crate::ports::{RegistrationLedger, SessionStore, UserDirectory};

use super::dto::{
    ErrorResponse, HistoryParams, RegisterRequest, RegistrationHistoryResponse,
    RegistrationResponse, ScheduleParams, ScheduleResponse,
};
use super::extract::{JsonBody, QueryParams};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct LectureHandlers {
    register_handler: Arc<RegisterForSessionHandler>,
    history_handler: Arc<ListUserRegistrationsHandler>,
    schedule_handler: Arc<ListSessionsHandler>,
}

impl LectureHandlers {
    pub fn new(
        register_handler: Arc<RegisterForSessionHandler>,
        history_handler: Arc<ListUserRegistrationsHandler>,
        schedule_handler: Arc<ListSessionsHandler>,
    ) -> Self {
        Self {
            register_handler,
            history_handler,
            schedule_handler,
        }
    }

    /// Wires every handler from the storage ports.
    pub fn from_ports(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        ledger: Arc<dyn RegistrationLedger>,
        admission: Arc<AdmissionController>,
    ) -> Self {
        Self::new(
            Arc::new(RegisterForSessionHandler::new(
                users.clone(),
                sessions.clone(),
                admission,
            )),
            Arc::new(ListUserRegistrationsHandler::new(
                users,
                sessions.clone(),
                ledger,
            )),
            Arc::new(ListSessionsHandler::new(sessions)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /lectures - Claim a seat in a session
pub async fn register(
    State(handlers): State<LectureHandlers>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Response {
    let user_id = match parse_id(&req.user_id, "user_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let session_id = match parse_id(&req.session_id, "session_id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RegisterForSessionCommand {
        user_id,
        session_id,
    };

    match handlers.register_handler.handle(cmd).await {
        Ok(receipt) => {
            let response: RegistrationResponse = receipt.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_registration_error(e),
    }
}

/// GET /lectures - Session schedule from a given day onward
pub async fn list_sessions(
    State(handlers): State<LectureHandlers>,
    QueryParams(params): QueryParams<ScheduleParams>,
) -> Response {
    let offering_id = match params.offering_id.as_deref() {
        Some(raw) => match parse_id(raw, "offering_id") {
            Ok(id) => Some(id),
            Err(response) => return response,
        },
        None => None,
    };

    let query = ListSessionsQuery {
        offering_id,
        year: params.year,
        month: params.month,
        day: params.day,
    };

    match handlers.schedule_handler.handle(query).await {
        Ok(schedule) => {
            let response: ScheduleResponse = schedule.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_registration_error(e),
    }
}

/// GET /lectures/registrations - A user's registered lectures
pub async fn list_registrations(
    State(handlers): State<LectureHandlers>,
    QueryParams(params): QueryParams<HistoryParams>,
) -> Response {
    let user_id = match parse_id(&params.user_id, "user_id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .history_handler
        .handle(ListUserRegistrationsQuery { user_id })
        .await
    {
        Ok(history) => {
            let response: RegistrationHistoryResponse = history.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_registration_error(e),
    }
}

fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, Response> {
    raw.parse::<T>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid {}: {}", field, raw))),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_registration_error(error: RegistrationError) -> Response {
    let status = match &error {
        RegistrationError::UserNotFound(_)
        | RegistrationError::SessionNotFound(_)
        | RegistrationError::NoRegistrations(_) => StatusCode::NOT_FOUND,
        RegistrationError::DuplicateRegistration { .. }
        | RegistrationError::CapacityExhausted(_) => StatusCode::CONFLICT,
        RegistrationError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        RegistrationError::Infrastructure(msg) => {
            tracing::error!("Internal error: {}", msg);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An internal error occurred")),
            )
                .into_response();
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}
