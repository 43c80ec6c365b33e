//! Session entity - one scheduled, capacity-bounded occurrence of an offering.
//!
//! # Ownership
//!
//! Sessions reference their offering by ID but do NOT own it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OfferingId, SessionId, Timestamp, ValidationError};

use super::SeatStatus;

/// A scheduled lecture session.
///
/// # Invariants
///
/// - `capacity` is positive and fixed at creation
/// - `0 <= occupancy <= capacity`
/// - `occupancy` only grows, one seat per committed registration, and only
///   through the admission controller's exclusive section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    offering_id: OfferingId,
    starts_at: Timestamp,
    capacity: u32,
    occupancy: u32,
}

impl Session {
    /// Create a new session with no seats taken.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `capacity` is zero
    pub fn new(
        id: SessionId,
        offering_id: OfferingId,
        starts_at: Timestamp,
        capacity: u32,
    ) -> Result<Self, ValidationError> {
        if capacity == 0 {
            return Err(ValidationError::out_of_range(
                "capacity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(Self {
            id,
            offering_id,
            starts_at,
            capacity,
            occupancy: 0,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        offering_id: OfferingId,
        starts_at: Timestamp,
        capacity: u32,
        occupancy: u32,
    ) -> Self {
        Self {
            id,
            offering_id,
            starts_at,
            capacity,
            occupancy,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the ID of the offering this session belongs to.
    pub fn offering_id(&self) -> &OfferingId {
        &self.offering_id
    }

    /// Returns when the session starts.
    pub fn starts_at(&self) -> &Timestamp {
        &self.starts_at
    }

    /// Returns the total number of seats.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of seats taken.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Seats still available.
    pub fn remaining_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.occupancy)
    }

    /// Current seat availability.
    pub fn status(&self) -> SeatStatus {
        SeatStatus::from_counts(self.capacity, self.occupancy)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Takes one seat.
    ///
    /// Performs no capacity check. Only the admission controller calls this,
    /// after it verified `occupancy < capacity` while holding the offering's
    /// exclusive section.
    pub(crate) fn increment_occupancy(&mut self) {
        self.occupancy += 1;
    }
}
