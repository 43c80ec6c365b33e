//! Registration record - the committed binding of a user to a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OfferingId, RegistrationId, SessionId, Timestamp, UserId};

use super::Session;

/// A committed, irrevocable registration.
///
/// Its existence is the only evidence that a (user, session) pair was
/// admitted. The offering ID is carried so duplicate checks span every
/// session of the same offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    id: RegistrationId,
    user_id: UserId,
    session_id: SessionId,
    offering_id: OfferingId,
    registered_at: Timestamp,
}

impl Registration {
    /// Records a registration of `user_id` for `session`, stamped now.
    pub fn record(user_id: UserId, session: &Session) -> Self {
        Self {
            id: RegistrationId::new(),
            user_id,
            session_id: *session.id(),
            offering_id: *session.offering_id(),
            registered_at: Timestamp::now(),
        }
    }

    /// Reconstitute a registration from persistence.
    pub fn reconstitute(
        id: RegistrationId,
        user_id: UserId,
        session_id: SessionId,
        offering_id: OfferingId,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            session_id,
            offering_id,
            registered_at,
        }
    }

    pub fn id(&self) -> &RegistrationId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn offering_id(&self) -> &OfferingId {
        &self.offering_id
    }

    /// When the registration was committed.
    pub fn registered_at(&self) -> &Timestamp {
        &self.registered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_copies_session_and_offering_ids() {
        let session = Session::new(SessionId::new(), OfferingId::new(), Timestamp::now(), 10)
            .unwrap();
        let user_id = UserId::new();

        let before = Timestamp::now();
        let registration = Registration::record(user_id, &session);

        assert_eq!(registration.user_id(), &user_id);
        assert_eq!(registration.session_id(), session.id());
        assert_eq!(registration.offering_id(), session.offering_id());
        assert!(!registration.registered_at().is_before(&before));
    }
}
