//! Lecture registration handlers.

mod list_sessions;
mod list_user_registrations;
mod register_for_session;

pub use list_sessions::{ListSessionsHandler, ListSessionsQuery, ScheduledSession, SessionSchedule};
pub use list_user_registrations::{
    ListUserRegistrationsHandler, ListUserRegistrationsQuery, RegistrationHistory,
    RegistrationHistoryEntry,
};
pub use register_for_session::{
    RegisterForSessionCommand, RegisterForSessionHandler, RegistrationReceipt,
};
