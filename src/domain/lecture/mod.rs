//! Lecture domain module.
//!
//! An `Offering` is the reusable lecture definition; each `Session` is one
//! dated occurrence with a fixed seat capacity; a `Registration` binds a user
//! to a session. A user may hold at most one registration per offering,
//! across all of its sessions.
//!
//! # State
//!
//! - Per session: `Open -> Full`, never back
//! - Per (user, offering): unregistered -> registered, never back

pub mod admission;
mod errors;
mod offering;
mod registration;
mod seat_status;
mod session;

pub use admission::AdmissionDecision;
pub use errors::RegistrationError;
pub use offering::{Offering, MAX_NAME_LENGTH};
pub use registration::Registration;
pub use seat_status::SeatStatus;
pub use session::Session;
