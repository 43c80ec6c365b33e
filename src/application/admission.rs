//! AdmissionController - race-free seat admission.
//!
//! Every admission runs inside the offering's exclusive section:
//!
//! 1. Enter the section (waits behind other admissions for the offering)
//! 2. Re-read the session; snapshots taken before entry are not trusted
//! 3. Duplicate check across all sessions of the offering
//! 4. Capacity check
//! 5. Append the registration and store the incremented occupancy
//! 6. Commit
//!
//! Any rejection or failure rolls the section back, so nothing from a failed
//! attempt is ever visible.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::lecture::admission::{evaluate, AdmissionDecision};
use crate::domain::lecture::{Registration, RegistrationError, Session};
use crate::ports::{AdmissionSection, RegistrationLedger};

/// Serializes admission decisions per offering.
pub struct AdmissionController {
    ledger: Arc<dyn RegistrationLedger>,
    acquire_timeout: Option<Duration>,
}

impl AdmissionController {
    pub fn new(ledger: Arc<dyn RegistrationLedger>) -> Self {
        Self {
            ledger,
            acquire_timeout: None,
        }
    }

    /// Bounds how long a caller waits to enter an offering's section.
    ///
    /// An attempt that times out fails with `Infrastructure` and has no
    /// effect.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Admit the user to the session, or explain why not.
    ///
    /// `session` only identifies the target; its counters are re-read under
    /// exclusivity.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session or its offering vanished
    /// - `DuplicateRegistration` if the user holds any seat in the offering
    /// - `CapacityExhausted` if the session is full
    /// - `Infrastructure` on storage failure or acquire timeout
    pub async fn try_register(
        &self,
        user_id: &UserId,
        session: &Session,
    ) -> Result<Registration, RegistrationError> {
        let mut section = self.enter(session).await?;

        match admit(section.as_mut(), user_id, session).await {
            Ok(registration) => {
                info!(
                    registration_id = %registration.id(),
                    user_id = %user_id,
                    session_id = %session.id(),
                    offering_id = %session.offering_id(),
                    "Registration admitted"
                );
                Ok(registration)
            }
            Err(err) => {
                if let Err(rollback_err) = section.rollback().await {
                    warn!(
                        offering_id = %session.offering_id(),
                        "Admission rollback failed: {}", rollback_err
                    );
                }
                debug!(
                    user_id = %user_id,
                    session_id = %session.id(),
                    code = %err.code(),
                    "Registration rejected"
                );
                Err(err)
            }
        }
    }

    async fn enter(
        &self,
        session: &Session,
    ) -> Result<Box<dyn AdmissionSection>, RegistrationError> {
        let offering_id = session.offering_id();
        let begin = self.ledger.begin_admission(offering_id);

        let entered = match self.acquire_timeout {
            Some(limit) => tokio::time::timeout(limit, begin).await.map_err(|_| {
                let err = DomainError::new(
                    ErrorCode::Timeout,
                    format!("Timed out waiting for admission to offering {}", offering_id),
                )
                .with_detail("timeout_ms", limit.as_millis().to_string());
                warn!(
                    offering_id = %offering_id,
                    code = %err.code,
                    timeout_ms = limit.as_millis() as u64,
                    "Timed out waiting for admission section"
                );
                RegistrationError::from(err)
            })?,
            None => begin.await,
        };

        let section = entered.map_err(|err| match err.code {
            ErrorCode::OfferingNotFound => RegistrationError::session_not_found(*session.id()),
            _ => RegistrationError::from(err),
        })?;

        debug!(
            offering_id = %offering_id,
            session_id = %session.id(),
            "Entered admission section"
        );
        Ok(section)
    }
}

async fn admit(
    section: &mut dyn AdmissionSection,
    user_id: &UserId,
    target: &Session,
) -> Result<Registration, RegistrationError> {
    let mut session = section
        .load_session(target.id())
        .await?
        .ok_or_else(|| RegistrationError::session_not_found(*target.id()))?;

    let already_registered = section.exists(user_id).await?;

    match evaluate(&session, already_registered) {
        AdmissionDecision::AlreadyRegistered => Err(RegistrationError::duplicate(
            *user_id,
            *section.offering_id(),
        )),
        AdmissionDecision::SessionFull => {
            Err(RegistrationError::capacity_exhausted(*session.id()))
        }
        AdmissionDecision::Admit => {
            session.increment_occupancy();
            let registration = section.append(user_id, &session).await?;
            section.store_occupancy(&session).await?;
            section.commit().await?;
            Ok(registration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRegistrationStore;
    use crate::domain::foundation::{OfferingId, SessionId, Timestamp};
    use crate::domain::lecture::Offering;
    use crate::ports::SessionStore;
    use async_trait::async_trait;

    async fn seeded(capacity: u32) -> (Arc<InMemoryRegistrationStore>, Session) {
        let store = Arc::new(InMemoryRegistrationStore::new());
        let offering = Offering::new(OfferingId::new(), "Lifetimes", "Yoon").unwrap();
        let session = Session::new(
            SessionId::new(),
            *offering.id(),
            Timestamp::now().add_days(1),
            capacity,
        )
        .unwrap();
        store.add_offering(offering).await;
        store.add_session(session.clone()).await.unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn admits_and_increments_occupancy() {
        let (store, session) = seeded(2).await;
        let controller = AdmissionController::new(store.clone());
        let user = UserId::new();

        let registration = controller.try_register(&user, &session).await.unwrap();

        assert_eq!(registration.user_id(), &user);
        assert_eq!(registration.session_id(), session.id());
        let stored = store.find_session(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.occupancy(), 1);
    }

    #[tokio::test]
    async fn stale_snapshot_does_not_bypass_capacity() {
        let (store, session) = seeded(1).await;
        let controller = AdmissionController::new(store.clone());

        controller.try_register(&UserId::new(), &session).await.unwrap();

        // `session` still reports occupancy 0
        let result = controller.try_register(&UserId::new(), &session).await;
        assert_eq!(
            result,
            Err(RegistrationError::capacity_exhausted(*session.id()))
        );
        let stored = store.find_session(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.occupancy(), 1);
    }

    #[tokio::test]
    async fn duplicate_wins_over_full_session() {
        let (store, session) = seeded(1).await;
        let controller = AdmissionController::new(store.clone());
        let user = UserId::new();

        controller.try_register(&user, &session).await.unwrap();
        let result = controller.try_register(&user, &session).await;

        assert!(matches!(
            result,
            Err(RegistrationError::DuplicateRegistration { .. })
        ));
    }

    #[tokio::test]
    async fn rejection_leaves_no_registration() {
        let (store, session) = seeded(1).await;
        let controller = AdmissionController::new(store.clone());
        let loser = UserId::new();

        controller.try_register(&UserId::new(), &session).await.unwrap();
        let _ = controller.try_register(&loser, &session).await;

        assert!(store.list_by_user(&loser).await.unwrap().is_empty());
        assert_eq!(store.registration_count(session.offering_id()).await, 1);
    }

    #[tokio::test]
    async fn unknown_offering_is_session_not_found() {
        let store = Arc::new(InMemoryRegistrationStore::new());
        let controller = AdmissionController::new(store);
        let orphan =
            Session::new(SessionId::new(), OfferingId::new(), Timestamp::now(), 3).unwrap();

        let result = controller.try_register(&UserId::new(), &orphan).await;
        assert_eq!(
            result,
            Err(RegistrationError::session_not_found(*orphan.id()))
        );
    }

    #[tokio::test]
    async fn acquire_timeout_fails_without_effect() {
        let (store, session) = seeded(5).await;
        let controller = AdmissionController::new(store.clone())
            .with_acquire_timeout(Duration::from_millis(20));

        let _held = store.begin_admission(session.offering_id()).await.unwrap();
        let result = controller.try_register(&UserId::new(), &session).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Infrastructure(ref msg)) if msg.contains("[TIMEOUT]")
        ));
        drop(_held);
        assert_eq!(store.registration_count(session.offering_id()).await, 0);
    }

    struct FailingLedger;

    #[async_trait]
    impl RegistrationLedger for FailingLedger {
        async fn begin_admission(
            &self,
            _offering_id: &OfferingId,
        ) -> Result<Box<dyn AdmissionSection>, DomainError> {
            Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated connection failure",
            ))
        }

        async fn list_by_user(
            &self,
            _user_id: &UserId,
        ) -> Result<Vec<Registration>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn storage_failure_is_infrastructure() {
        let controller = AdmissionController::new(Arc::new(FailingLedger));
        let session =
            Session::new(SessionId::new(), OfferingId::new(), Timestamp::now(), 3).unwrap();

        let result = controller.try_register(&UserId::new(), &session).await;
        assert!(matches!(
            result,
            Err(RegistrationError::Infrastructure(msg)) if msg.contains("Simulated")
        ));
    }
}
