//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! Seat admission itself lives in [`AdmissionController`], which every
//! registration command goes through.

mod admission;
pub mod handlers;

pub use admission::AdmissionController;
pub use handlers::{
    ListSessionsHandler, ListSessionsQuery, ListUserRegistrationsHandler,
    ListUserRegistrationsQuery, RegisterForSessionCommand, RegisterForSessionHandler,
    RegistrationHistory, RegistrationHistoryEntry, RegistrationReceipt, ScheduledSession,
    SessionSchedule,
};
