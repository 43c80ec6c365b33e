//! Registration ledger port.
//!
//! The ledger is the source of truth for who registered where. Its writes
//! happen only inside an [`AdmissionSection`]: an exclusive scope over one
//! offering that guards both the offering's registration set and its
//! sessions' occupancy counters.
//!
//! # Exclusivity contract
//!
//! - At most one open section per offering at any time; a second
//!   `begin_admission` for the same offering waits until the first section
//!   is committed, rolled back or dropped
//! - Sections for different offerings never wait on each other
//! - Reads inside a section observe every previously committed section
//! - A section dropped without `commit` leaves no trace

use crate::domain::foundation::{DomainError, OfferingId, SessionId, UserId};
use crate::domain::lecture::{Registration, Session};
use async_trait::async_trait;

/// Ledger of committed registrations.
#[async_trait]
pub trait RegistrationLedger: Send + Sync {
    /// Open the exclusive admission section for an offering.
    ///
    /// Waits while another section for the same offering is open.
    ///
    /// # Errors
    ///
    /// - `OfferingNotFound` if the offering doesn't exist
    /// - `DatabaseError` on storage failure
    async fn begin_admission(
        &self,
        offering_id: &OfferingId,
    ) -> Result<Box<dyn AdmissionSection>, DomainError>;

    /// All registrations of a user.
    ///
    /// Ordered by session start time descending, then by registration time
    /// descending.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Registration>, DomainError>;
}

/// Exclusive read-check-write scope over one offering.
#[async_trait]
pub trait AdmissionSection: Send {
    /// The offering this section holds.
    fn offering_id(&self) -> &OfferingId;

    /// Fresh read of a session belonging to this section's offering.
    ///
    /// Returns `None` if the session doesn't exist or belongs to another
    /// offering.
    async fn load_session(&mut self, session_id: &SessionId)
        -> Result<Option<Session>, DomainError>;

    /// True if the user holds a registration for any session of this
    /// section's offering.
    async fn exists(&mut self, user_id: &UserId) -> Result<bool, DomainError>;

    /// Create a registration for the user on the session, stamped now.
    async fn append(
        &mut self,
        user_id: &UserId,
        session: &Session,
    ) -> Result<Registration, DomainError>;

    /// Persist the session's occupancy.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the new occupancy exceeds capacity or
    ///   is lower than the stored one
    async fn store_occupancy(&mut self, session: &Session) -> Result<(), DomainError>;

    /// Make all writes of this section visible and release exclusivity.
    async fn commit(&mut self) -> Result<(), DomainError>;

    /// Discard all writes of this section and release exclusivity.
    async fn rollback(&mut self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn RegistrationLedger) {}
    }

    #[test]
    fn admission_section_is_object_safe() {
        fn _accepts_dyn(_section: &mut dyn AdmissionSection) {}
    }
}
