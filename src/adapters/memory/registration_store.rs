//! In-memory offering, session and registration storage.
//!
//! Each offering owns one `OfferingBook` behind its own `tokio::sync::Mutex`.
//! The book holds the offering's sessions (with their occupancy) and its
//! registration set, so a single lock makes the capacity check and the
//! cross-session duplicate check race-free. Offerings never share a lock.
//!
//! `SessionStore` reads are served from a committed copy of every session,
//! refreshed by `commit`, so schedule and snapshot reads never queue behind
//! an open admission section.
//!
//! Lock order: an offering's book, then the committed sessions, then the
//! per-user index. Neither of the latter is held while waiting on a book.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::{
    DomainError, ErrorCode, OfferingId, RegistrationId, SessionId, Timestamp, UserId,
};
use crate::domain::lecture::{Offering, Registration, Session};
use crate::ports::{AdmissionSection, RegistrationLedger, SessionStore};

type UserIndex = Arc<RwLock<HashMap<UserId, Vec<UserEntry>>>>;
type CommittedSessions = Arc<RwLock<HashMap<SessionId, Session>>>;

/// In-memory store for single-process deployments and tests.
#[derive(Debug, Default)]
pub struct InMemoryRegistrationStore {
    offerings: RwLock<HashMap<OfferingId, Offering>>,
    books: RwLock<HashMap<OfferingId, Arc<Mutex<OfferingBook>>>>,
    committed: CommittedSessions,
    by_user: UserIndex,
}

/// Mutable state of one offering, guarded as a unit.
#[derive(Debug, Default)]
struct OfferingBook {
    sessions: HashMap<SessionId, Session>,
    registrants: HashMap<UserId, RegistrationId>,
}

/// A registration plus the start time of its session, for ordering.
#[derive(Debug, Clone)]
struct UserEntry {
    registration: Registration,
    starts_at: Timestamp,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Administrative seeding ===

    /// Adds an offering. Re-adding an existing ID replaces its details but
    /// keeps its sessions and registrations.
    pub async fn add_offering(&self, offering: Offering) {
        let id = *offering.id();
        self.offerings.write().await.insert(id, offering);
        self.books.write().await.entry(id).or_default();
    }

    /// Adds a session to an existing offering.
    ///
    /// # Errors
    ///
    /// - `OfferingNotFound` if the session's offering was never added
    pub async fn add_session(&self, session: Session) -> Result<(), DomainError> {
        let offering_id = *session.offering_id();
        let book = self.book(&offering_id).await.ok_or_else(|| {
            DomainError::new(
                ErrorCode::OfferingNotFound,
                format!("Offering not found: {}", offering_id),
            )
        })?;

        let session_id = *session.id();
        let mut guard = book.lock().await;
        guard.sessions.insert(session_id, session.clone());
        self.committed.write().await.insert(session_id, session);
        Ok(())
    }

    /// Number of committed registrations for an offering.
    pub async fn registration_count(&self, offering_id: &OfferingId) -> usize {
        match self.book(offering_id).await {
            Some(book) => book.lock().await.registrants.len(),
            None => 0,
        }
    }

    async fn book(&self, offering_id: &OfferingId) -> Option<Arc<Mutex<OfferingBook>>> {
        self.books.read().await.get(offering_id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemoryRegistrationStore {
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.committed.read().await.get(id).cloned())
    }

    async fn find_offering(&self, id: &OfferingId) -> Result<Option<Offering>, DomainError> {
        Ok(self.offerings.read().await.get(id).cloned())
    }

    async fn find_sessions_matching(
        &self,
        offering_id: Option<&OfferingId>,
        not_before: Option<&Timestamp>,
    ) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self
            .committed
            .read()
            .await
            .values()
            .filter(|s| offering_id.map_or(true, |wanted| s.offering_id() == wanted))
            .filter(|s| not_before.map_or(true, |bound| !s.starts_at().is_before(bound)))
            .cloned()
            .collect();

        sessions.sort_by(|a, b| b.starts_at().cmp(a.starts_at()));
        Ok(sessions)
    }
}

#[async_trait]
impl RegistrationLedger for InMemoryRegistrationStore {
    async fn begin_admission(
        &self,
        offering_id: &OfferingId,
    ) -> Result<Box<dyn AdmissionSection>, DomainError> {
        let book = self.book(offering_id).await.ok_or_else(|| {
            DomainError::new(
                ErrorCode::OfferingNotFound,
                format!("Offering not found: {}", offering_id),
            )
        })?;

        let guard = book.lock_owned().await;
        Ok(Box::new(InMemoryAdmissionSection {
            offering_id: *offering_id,
            book: Some(guard),
            committed: Arc::clone(&self.committed),
            by_user: Arc::clone(&self.by_user),
            staged_registrations: Vec::new(),
            staged_sessions: HashMap::new(),
        }))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Registration>, DomainError> {
        let mut entries = self
            .by_user
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();

        entries.sort_by(|a, b| {
            b.starts_at
                .cmp(&a.starts_at)
                .then_with(|| b.registration.registered_at().cmp(a.registration.registered_at()))
        });
        Ok(entries.into_iter().map(|e| e.registration).collect())
    }
}

/// Holds an offering's book lock; writes are staged until `commit`.
struct InMemoryAdmissionSection {
    offering_id: OfferingId,
    book: Option<OwnedMutexGuard<OfferingBook>>,
    committed: CommittedSessions,
    by_user: UserIndex,
    staged_registrations: Vec<UserEntry>,
    staged_sessions: HashMap<SessionId, Session>,
}

impl InMemoryAdmissionSection {
    fn book(&self) -> Result<&OfferingBook, DomainError> {
        self.book.as_deref().ok_or_else(section_closed)
    }

    fn current_session(&self, session_id: &SessionId) -> Result<Option<Session>, DomainError> {
        let book = self.book()?;
        Ok(self
            .staged_sessions
            .get(session_id)
            .or_else(|| book.sessions.get(session_id))
            .cloned())
    }
}

#[async_trait]
impl AdmissionSection for InMemoryAdmissionSection {
    fn offering_id(&self) -> &OfferingId {
        &self.offering_id
    }

    async fn load_session(
        &mut self,
        session_id: &SessionId,
    ) -> Result<Option<Session>, DomainError> {
        self.current_session(session_id)
    }

    async fn exists(&mut self, user_id: &UserId) -> Result<bool, DomainError> {
        let book = self.book()?;
        Ok(book.registrants.contains_key(user_id)
            || self
                .staged_registrations
                .iter()
                .any(|e| e.registration.user_id() == user_id))
    }

    async fn append(
        &mut self,
        user_id: &UserId,
        session: &Session,
    ) -> Result<Registration, DomainError> {
        if self.current_session(session.id())?.is_none() {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!(
                    "Session {} is not part of offering {}",
                    session.id(),
                    self.offering_id
                ),
            ));
        }

        let registration = Registration::record(*user_id, session);
        self.staged_registrations.push(UserEntry {
            registration: registration.clone(),
            starts_at: *session.starts_at(),
        });
        Ok(registration)
    }

    async fn store_occupancy(&mut self, session: &Session) -> Result<(), DomainError> {
        let stored = self.current_session(session.id())?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;

        if session.occupancy() > stored.capacity() || session.occupancy() < stored.occupancy() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Occupancy {} -> {} violates capacity {}",
                    stored.occupancy(),
                    session.occupancy(),
                    stored.capacity()
                ),
            ));
        }

        self.staged_sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let mut book = self.book.take().ok_or_else(section_closed)?;

        if !self.staged_sessions.is_empty() {
            let mut committed = self.committed.write().await;
            for (id, session) in self.staged_sessions.drain() {
                committed.insert(id, session.clone());
                book.sessions.insert(id, session);
            }
        }

        let entries = std::mem::take(&mut self.staged_registrations);
        for entry in &entries {
            book.registrants
                .insert(*entry.registration.user_id(), *entry.registration.id());
        }

        if !entries.is_empty() {
            let mut by_user = self.by_user.write().await;
            for entry in entries {
                by_user
                    .entry(*entry.registration.user_id())
                    .or_default()
                    .push(entry);
            }
        }

        // Book lock released here, after the user index is updated.
        drop(book);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        self.staged_registrations.clear();
        self.staged_sessions.clear();
        self.book = None;
        Ok(())
    }
}

fn section_closed() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Admission section already closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn store_with_session(capacity: u32) -> (InMemoryRegistrationStore, Session) {
        let store = InMemoryRegistrationStore::new();
        let offering = Offering::new(OfferingId::new(), "Rust Ownership", "Park").unwrap();
        let session = Session::new(
            SessionId::new(),
            *offering.id(),
            Timestamp::now().add_days(3),
            capacity,
        )
        .unwrap();
        store.add_offering(offering).await;
        store.add_session(session.clone()).await.unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn add_session_requires_offering() {
        let store = InMemoryRegistrationStore::new();
        let session =
            Session::new(SessionId::new(), OfferingId::new(), Timestamp::now(), 5).unwrap();
        let err = store.add_session(session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OfferingNotFound);
    }

    #[tokio::test]
    async fn committed_section_is_visible() {
        let (store, session) = store_with_session(5).await;
        let user = UserId::new();

        let mut section = store.begin_admission(session.offering_id()).await.unwrap();
        let mut current = section.load_session(session.id()).await.unwrap().unwrap();
        current.increment_occupancy();
        section.append(&user, &current).await.unwrap();
        section.store_occupancy(&current).await.unwrap();
        section.commit().await.unwrap();

        let stored = store.find_session(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.occupancy(), 1);
        assert_eq!(store.list_by_user(&user).await.unwrap().len(), 1);
        assert_eq!(store.registration_count(session.offering_id()).await, 1);
    }

    #[tokio::test]
    async fn rolled_back_section_leaves_no_trace() {
        let (store, session) = store_with_session(5).await;
        let user = UserId::new();

        let mut section = store.begin_admission(session.offering_id()).await.unwrap();
        let mut current = section.load_session(session.id()).await.unwrap().unwrap();
        current.increment_occupancy();
        section.append(&user, &current).await.unwrap();
        section.store_occupancy(&current).await.unwrap();
        section.rollback().await.unwrap();

        let stored = store.find_session(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.occupancy(), 0);
        assert!(store.list_by_user(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_section_releases_lock_without_writes() {
        let (store, session) = store_with_session(5).await;
        {
            let mut section = store.begin_admission(session.offering_id()).await.unwrap();
            let current = section.load_session(session.id()).await.unwrap().unwrap();
            section.append(&UserId::new(), &current).await.unwrap();
        }

        let reopened = tokio::time::timeout(
            Duration::from_secs(1),
            store.begin_admission(session.offering_id()),
        )
        .await;
        assert!(reopened.is_ok());
        assert_eq!(store.registration_count(session.offering_id()).await, 0);
    }

    #[tokio::test]
    async fn second_section_waits_for_first() {
        let (store, session) = store_with_session(5).await;
        let _first = store.begin_admission(session.offering_id()).await.unwrap();

        let second = tokio::time::timeout(
            Duration::from_millis(50),
            store.begin_admission(session.offering_id()),
        )
        .await;
        assert!(second.is_err(), "second section must wait for the first");
    }

    #[tokio::test]
    async fn sections_for_other_offerings_do_not_wait() {
        let (store, session) = store_with_session(5).await;
        let other = Offering::new(OfferingId::new(), "Async Rust", "Lee").unwrap();
        let other_id = *other.id();
        store.add_offering(other).await;

        let _held = store.begin_admission(session.offering_id()).await.unwrap();
        let other_section =
            tokio::time::timeout(Duration::from_millis(50), store.begin_admission(&other_id))
                .await;
        assert!(other_section.is_ok());
    }

    #[tokio::test]
    async fn snapshot_reads_do_not_wait_on_open_section() {
        let (store, session) = store_with_session(5).await;

        let mut section = store.begin_admission(session.offering_id()).await.unwrap();
        let mut current = section.load_session(session.id()).await.unwrap().unwrap();
        current.increment_occupancy();
        section.append(&UserId::new(), &current).await.unwrap();
        section.store_occupancy(&current).await.unwrap();

        let during = tokio::time::timeout(Duration::from_millis(50), store.find_session(session.id()))
            .await
            .expect("find_session must not wait for the section")
            .unwrap()
            .unwrap();
        assert_eq!(during.occupancy(), 0);

        let listed = tokio::time::timeout(
            Duration::from_millis(50),
            store.find_sessions_matching(Some(session.offering_id()), None),
        )
        .await
        .expect("find_sessions_matching must not wait for the section")
        .unwrap();
        assert_eq!(listed.len(), 1);

        section.commit().await.unwrap();
        let after = store.find_session(session.id()).await.unwrap().unwrap();
        assert_eq!(after.occupancy(), 1);
    }

    #[tokio::test]
    async fn store_occupancy_rejects_overflow() {
        let (store, session) = store_with_session(1).await;
        let mut section = store.begin_admission(session.offering_id()).await.unwrap();
        let overfull = Session::reconstitute(
            *session.id(),
            *session.offering_id(),
            *session.starts_at(),
            1,
            2,
        );
        let err = section.store_occupancy(&overfull).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn closed_section_rejects_further_use() {
        let (store, session) = store_with_session(1).await;
        let mut section = store.begin_admission(session.offering_id()).await.unwrap();
        section.commit().await.unwrap();
        assert!(section.exists(&UserId::new()).await.is_err());
        assert!(section.commit().await.is_err());
    }

    #[tokio::test]
    async fn sessions_matching_filters_and_orders_descending() {
        let store = InMemoryRegistrationStore::new();
        let offering = Offering::new(OfferingId::new(), "Databases", "Choi").unwrap();
        let other = Offering::new(OfferingId::new(), "Networks", "Jung").unwrap();
        let base = Timestamp::start_of_day(2024, 10, 1).unwrap();

        let early = Session::new(SessionId::new(), *offering.id(), base.add_hours(9), 10).unwrap();
        let late = Session::new(SessionId::new(), *offering.id(), base.add_days(2), 10).unwrap();
        let past =
            Session::new(SessionId::new(), *offering.id(), base.add_days(-1), 10).unwrap();
        let foreign = Session::new(SessionId::new(), *other.id(), base.add_days(1), 10).unwrap();

        store.add_offering(offering.clone()).await;
        store.add_offering(other).await;
        for s in [early.clone(), late.clone(), past, foreign] {
            store.add_session(s).await.unwrap();
        }

        let found = store
            .find_sessions_matching(Some(offering.id()), Some(&base))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|s| *s.id()).collect();
        assert_eq!(ids, vec![*late.id(), *early.id()]);

        let everything = store.find_sessions_matching(None, None).await.unwrap();
        assert_eq!(everything.len(), 4);
    }
}
