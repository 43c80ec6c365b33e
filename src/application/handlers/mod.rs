//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod lecture;

pub use lecture::{
    // Commands
    RegisterForSessionCommand, RegisterForSessionHandler, RegistrationReceipt,
    // Queries
    ListSessionsHandler, ListSessionsQuery, ListUserRegistrationsHandler,
    ListUserRegistrationsQuery, RegistrationHistory, RegistrationHistoryEntry,
    ScheduledSession, SessionSchedule,
};
