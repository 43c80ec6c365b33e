//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `UserDirectory` - Resolves registering users
//! - `SessionStore` - Reads offerings and sessions
//! - `RegistrationLedger` - Records registrations; opens the per-offering
//!   `AdmissionSection` that serializes admission decisions

mod registration_ledger;
mod session_store;
mod user_directory;

pub use registration_ledger::{AdmissionSection, RegistrationLedger};
pub use session_store::SessionStore;
pub use user_directory::UserDirectory;
