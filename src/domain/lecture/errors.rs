//! Registration error types.
//!
//! Every variant is an expected, caller-recoverable outcome. None of them
//! leaves shared state partially mutated.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UserNotFound | 404 |
//! | SessionNotFound | 404 |
//! | NoRegistrations | 404 |
//! | DuplicateRegistration | 409 |
//! | CapacityExhausted | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    DomainError, ErrorCode, OfferingId, SessionId, UserId, ValidationError,
};

/// Errors surfaced by registration commands and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// No user with this ID exists.
    UserNotFound(UserId),

    /// No session with this ID exists.
    SessionNotFound(SessionId),

    /// The user already holds a registration for a session of this offering.
    DuplicateRegistration {
        user_id: UserId,
        offering_id: OfferingId,
    },

    /// The session has no remaining seats.
    CapacityExhausted(SessionId),

    /// The user has never registered for anything.
    NoRegistrations(UserId),

    /// Query or command input failed validation.
    ValidationFailed { field: String, message: String },

    /// Storage or coordination failure.
    Infrastructure(String),
}

impl RegistrationError {
    pub fn user_not_found(id: UserId) -> Self {
        RegistrationError::UserNotFound(id)
    }
    pub fn session_not_found(id: SessionId) -> Self {
        RegistrationError::SessionNotFound(id)
    }
    pub fn duplicate(user_id: UserId, offering_id: OfferingId) -> Self {
        RegistrationError::DuplicateRegistration {
            user_id,
            offering_id,
        }
    }
    pub fn capacity_exhausted(session_id: SessionId) -> Self {
        RegistrationError::CapacityExhausted(session_id)
    }
    pub fn no_registrations(user_id: UserId) -> Self {
        RegistrationError::NoRegistrations(user_id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RegistrationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        RegistrationError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RegistrationError::UserNotFound(_) => ErrorCode::UserNotFound,
            RegistrationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            RegistrationError::DuplicateRegistration { .. } => ErrorCode::AlreadyRegistered,
            RegistrationError::CapacityExhausted(_) => ErrorCode::NoRemainingSeats,
            RegistrationError::NoRegistrations(_) => ErrorCode::NoRegistrations,
            RegistrationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            RegistrationError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RegistrationError::UserNotFound(id) => format!("User not found: {}", id),
            RegistrationError::SessionNotFound(id) => format!("Session not found: {}", id),
            RegistrationError::DuplicateRegistration { offering_id, .. } => {
                format!("Already registered for lecture {}", offering_id)
            }
            RegistrationError::CapacityExhausted(id) => {
                format!("No remaining seats for session {}", id)
            }
            RegistrationError::NoRegistrations(_) => "No registered lectures".to_string(),
            RegistrationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            RegistrationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RegistrationError {}

impl From<DomainError> for RegistrationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => RegistrationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => RegistrationError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for RegistrationError {
    fn from(err: ValidationError) -> Self {
        RegistrationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
