//! The admission rule.
//!
//! Pure decision over a freshly read session and the ledger's duplication
//! state. Callers must evaluate it inside the offering's exclusive section;
//! see `application::AdmissionController`.

use serde::{Deserialize, Serialize};

use super::Session;

/// Outcome of evaluating one registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionDecision {
    /// A seat is free and the user holds no registration for the offering.
    Admit,
    /// The user already registered for some session of this offering.
    AlreadyRegistered,
    /// Every seat of the session is taken.
    SessionFull,
}

/// Decides whether a registration may be committed.
///
/// The duplication check runs first, so a registered user retrying a full
/// session is told about the duplicate rather than the capacity.
pub fn evaluate(session: &Session, already_registered: bool) -> AdmissionDecision {
    if already_registered {
        AdmissionDecision::AlreadyRegistered
    } else if session.status().accepts_registrations() {
        AdmissionDecision::Admit
    } else {
        AdmissionDecision::SessionFull
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OfferingId, SessionId, Timestamp};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn session(capacity: u32, occupancy: u32) -> Session {
        Session::reconstitute(
            SessionId::new(),
            OfferingId::new(),
            Timestamp::now(),
            capacity,
            occupancy,
        )
    }

    #[test]
    fn admits_when_seats_remain() {
        assert_eq!(evaluate(&session(30, 29), false), AdmissionDecision::Admit);
    }

    #[test]
    fn rejects_full_session() {
        assert_eq!(evaluate(&session(30, 30), false), AdmissionDecision::SessionFull);
    }

    #[test]
    fn duplicate_wins_over_capacity() {
        assert_eq!(
            evaluate(&session(30, 30), true),
            AdmissionDecision::AlreadyRegistered
        );
        assert_eq!(
            evaluate(&session(30, 0), true),
            AdmissionDecision::AlreadyRegistered
        );
    }

    proptest! {
        #[test]
        fn serial_attempts_never_overfill(
            capacity in 1u32..40,
            attempts in proptest::collection::vec(0u8..60, 0..200),
        ) {
            let mut current = session(capacity, 0);
            let mut registered: HashSet<u8> = HashSet::new();
            let mut admitted = 0u32;

            for user in &attempts {
                let before = current.occupancy();
                match evaluate(&current, registered.contains(user)) {
                    AdmissionDecision::Admit => {
                        current.increment_occupancy();
                        registered.insert(*user);
                        admitted += 1;
                    }
                    AdmissionDecision::AlreadyRegistered => {
                        prop_assert!(registered.contains(user));
                    }
                    AdmissionDecision::SessionFull => {
                        prop_assert_eq!(current.occupancy(), capacity);
                    }
                }
                prop_assert!(current.occupancy() >= before);
                prop_assert!(current.occupancy() <= capacity);
            }

            let distinct = attempts.iter().collect::<HashSet<_>>().len() as u32;
            prop_assert_eq!(admitted, distinct.min(capacity));
            prop_assert_eq!(current.occupancy(), admitted);
        }
    }
}
