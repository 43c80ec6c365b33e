//! HTTP DTOs for lecture endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::{
    RegistrationHistory, RegistrationHistoryEntry, RegistrationReceipt, ScheduledSession,
    SessionSchedule,
};
use crate::domain::foundation::Timestamp;
use crate::domain::lecture::{RegistrationError, SeatStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to claim a seat.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub session_id: String,
}

/// Query parameters for the session schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleParams {
    #[serde(default)]
    pub offering_id: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

/// Query parameters for registration history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryParams {
    pub user_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Confirmation of a claimed seat.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    pub registration_id: String,
    pub session_id: String,
    pub lecture_name: String,
    pub presenter_name: String,
    pub user_name: String,
    pub registered_at: String,
}

impl From<RegistrationReceipt> for RegistrationResponse {
    fn from(receipt: RegistrationReceipt) -> Self {
        Self {
            registration_id: receipt.registration_id.to_string(),
            session_id: receipt.session_id.to_string(),
            lecture_name: receipt.offering_name,
            presenter_name: receipt.presenter_name,
            user_name: receipt.user_name,
            registered_at: rfc3339(&receipt.registered_at),
        }
    }
}

/// Sessions starting at the same moment.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSlotResponse {
    pub starts_at: String,
    pub sessions: Vec<ScheduledSessionResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledSessionResponse {
    pub lecture_id: String,
    pub session_id: String,
    pub lecture_name: String,
    pub presenter_name: String,
    pub capacity: u32,
    pub occupancy: u32,
    pub remaining_seats: u32,
    pub status: SeatStatus,
}

impl From<ScheduledSession> for ScheduledSessionResponse {
    fn from(session: ScheduledSession) -> Self {
        Self {
            lecture_id: session.offering_id.to_string(),
            session_id: session.session_id.to_string(),
            lecture_name: session.offering_name,
            presenter_name: session.presenter_name,
            capacity: session.capacity,
            occupancy: session.occupancy,
            remaining_seats: session.remaining_seats,
            status: session.status,
        }
    }
}

/// Schedule ordered by start time, earliest first.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub slots: Vec<ScheduleSlotResponse>,
}

impl From<SessionSchedule> for ScheduleResponse {
    fn from(schedule: SessionSchedule) -> Self {
        let slots = schedule
            .into_iter()
            .map(|(starts_at, sessions)| ScheduleSlotResponse {
                starts_at: rfc3339(&starts_at),
                sessions: sessions.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { slots }
    }
}

/// A user's registered lectures.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationHistoryResponse {
    pub user_name: String,
    pub registrations: Vec<RegistrationHistoryEntryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationHistoryEntryResponse {
    pub lecture_name: String,
    pub presenter_name: String,
    pub starts_at: String,
    pub registered_at: String,
}

impl From<RegistrationHistoryEntry> for RegistrationHistoryEntryResponse {
    fn from(entry: RegistrationHistoryEntry) -> Self {
        Self {
            lecture_name: entry.offering_name,
            presenter_name: entry.presenter_name,
            starts_at: rfc3339(&entry.starts_at),
            registered_at: rfc3339(&entry.registered_at),
        }
    }
}

impl From<RegistrationHistory> for RegistrationHistoryResponse {
    fn from(history: RegistrationHistory) -> Self {
        Self {
            user_name: history.user_name,
            registrations: history.entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&RegistrationError> for ErrorResponse {
    fn from(error: &RegistrationError) -> Self {
        let details = match error {
            RegistrationError::ValidationFailed { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        };
        Self {
            code: error.code().to_string(),
            message: error.message(),
            details,
        }
    }
}

fn rfc3339(timestamp: &Timestamp) -> String {
    timestamp.as_datetime().to_rfc3339()
}
