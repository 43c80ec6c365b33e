//! In-memory adapters.
//!
//! Used by the `memory` storage backend and throughout the test suite.
//! [`SeedData`] preloads them from a JSON fixture.

mod registration_store;
mod seed;
mod user_directory;

pub use registration_store::InMemoryRegistrationStore;
pub use seed::{SeedData, SeedError, SeedSummary};
pub use user_directory::InMemoryUserDirectory;
