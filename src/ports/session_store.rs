//! Session store port (read side).
//!
//! Offerings and sessions are created by an administrative path; this port
//! only reads them. Occupancy is written exclusively through an
//! [`AdmissionSection`](super::AdmissionSection).
//!
//! # Design
//!
//! - **Explicit lookups**: sessions carry their offering's ID, and callers
//!   resolve the offering with a second call instead of relying on lazy
//!   loading
//! - **Snapshot reads**: values returned here may be stale by the time the
//!   caller acts on them; admission re-reads inside its exclusive section

use crate::domain::foundation::{DomainError, OfferingId, SessionId, Timestamp};
use crate::domain::lecture::{Offering, Session};
use async_trait::async_trait;

/// Read port for offerings and their sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Find an offering by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_offering(&self, id: &OfferingId) -> Result<Option<Offering>, DomainError>;

    /// Sessions filtered by offering and earliest start time.
    ///
    /// `None` filters are ignored. Returns sessions ordered by start time
    /// descending.
    async fn find_sessions_matching(
        &self,
        offering_id: Option<&OfferingId>,
        not_before: Option<&Timestamp>,
    ) -> Result<Vec<Session>, DomainError>;
}
