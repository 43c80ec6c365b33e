//! JSON fixtures for preloading the in-memory backend.
//!
//! ```json
//! {
//!   "users": [{ "id": "…", "name": "Kim" }],
//!   "offerings": [{
//!     "id": "…", "name": "Rust Ownership", "presenter": "Park",
//!     "sessions": [{ "id": "…", "starts_at": "2024-10-01T09:00:00Z", "capacity": 30 }]
//!   }]
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

use super::{InMemoryRegistrationStore, InMemoryUserDirectory};
use crate::domain::foundation::{
    DomainError, OfferingId, SessionId, Timestamp, UserId, ValidationError,
};
use crate::domain::lecture::{Offering, Session};
use crate::domain::user::User;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid seed entry: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Seeding failed: {0}")]
    Storage(#[from] DomainError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    offerings: Vec<SeedOffering>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedUser {
    id: UserId,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedOffering {
    id: OfferingId,
    name: String,
    presenter: String,
    #[serde(default)]
    sessions: Vec<SeedSession>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedSession {
    id: SessionId,
    starts_at: Timestamp,
    capacity: u32,
}

/// Counts of seeded records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub offerings: usize,
    pub sessions: usize,
}

impl SeedData {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load_file(path: &str) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_string(),
                source,
            })?;
        Self::from_json(&raw)
    }

    /// Validates every entry, then loads them into the stores.
    pub async fn apply(
        self,
        users: &InMemoryUserDirectory,
        store: &InMemoryRegistrationStore,
    ) -> Result<SeedSummary, SeedError> {
        let mut summary = SeedSummary::default();

        for seed in self.users {
            users.add_user(User::new(seed.id, seed.name)?).await;
            summary.users += 1;
        }

        for seed in self.offerings {
            let offering = Offering::new(seed.id, seed.name, seed.presenter)?;
            store.add_offering(offering).await;
            summary.offerings += 1;

            for session in seed.sessions {
                let session =
                    Session::new(session.id, seed.id, session.starts_at, session.capacity)?;
                store.add_session(session).await?;
                summary.sessions += 1;
            }
        }

        Ok(summary)
    }
}
