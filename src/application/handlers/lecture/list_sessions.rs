//! ListSessionsHandler - Query handler for the session schedule.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::domain::foundation::{OfferingId, SessionId, Timestamp, ValidationError};
use crate::domain::lecture::{Offering, RegistrationError, SeatStatus};
use crate::ports::SessionStore;

/// Query for sessions starting on or after a calendar day.
///
/// Missing date parts default to today's (UTC).
#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub offering_id: Option<OfferingId>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// One session in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSession {
    pub offering_id: OfferingId,
    pub session_id: SessionId,
    pub offering_name: String,
    pub presenter_name: String,
    pub starts_at: Timestamp,
    pub capacity: u32,
    pub occupancy: u32,
    pub remaining_seats: u32,
    pub status: SeatStatus,
}

/// Sessions grouped by start time, earliest first.
pub type SessionSchedule = BTreeMap<Timestamp, Vec<ScheduledSession>>;

impl ListSessionsQuery {
    /// Midnight UTC of the requested day.
    pub fn not_before(&self) -> Result<Timestamp, ValidationError> {
        let today = Utc::now().date_naive();
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        let day = self.day.unwrap_or_else(|| today.day());

        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("month", 1, 12, month as i64));
        }
        if !(1..=31).contains(&day) {
            return Err(ValidationError::out_of_range("day", 1, 31, day as i64));
        }

        Timestamp::start_of_day(year, month, day).ok_or_else(|| {
            ValidationError::invalid_format(
                "day",
                format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
            )
        })
    }
}

/// Handler for the session schedule.
pub struct ListSessionsHandler {
    sessions: Arc<dyn SessionStore>,
}

impl ListSessionsHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(
        &self,
        query: ListSessionsQuery,
    ) -> Result<SessionSchedule, RegistrationError> {
        let not_before = query.not_before()?;

        let sessions = self
            .sessions
            .find_sessions_matching(query.offering_id.as_ref(), Some(&not_before))
            .await?;

        let mut offerings: HashMap<OfferingId, Offering> = HashMap::new();
        let mut schedule = SessionSchedule::new();

        for session in sessions {
            let offering_id = *session.offering_id();
            if !offerings.contains_key(&offering_id) {
                match self.sessions.find_offering(&offering_id).await? {
                    Some(offering) => {
                        offerings.insert(offering_id, offering);
                    }
                    None => {
                        tracing::warn!(
                            session_id = %session.id(),
                            offering_id = %offering_id,
                            "Skipping session without offering"
                        );
                        continue;
                    }
                }
            }
            let offering = &offerings[&offering_id];

            schedule
                .entry(*session.starts_at())
                .or_default()
                .push(ScheduledSession {
                    offering_id,
                    session_id: *session.id(),
                    offering_name: offering.name().to_string(),
                    presenter_name: offering.presenter().to_string(),
                    starts_at: *session.starts_at(),
                    capacity: session.capacity(),
                    occupancy: session.occupancy(),
                    remaining_seats: session.remaining_seats(),
                    status: session.status(),
                });
        }

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRegistrationStore;
    use crate::domain::lecture::Session;

    async fn store_with(
        sessions: &[(&Offering, Timestamp)],
    ) -> Arc<InMemoryRegistrationStore> {
        let store = Arc::new(InMemoryRegistrationStore::new());
        for (offering, starts_at) in sessions {
            store.add_offering((*offering).clone()).await;
            let session = Session::new(SessionId::new(), *offering.id(), *starts_at, 20).unwrap();
            store.add_session(session).await.unwrap();
        }
        store
    }

    fn query(year: i32, month: u32, day: u32) -> ListSessionsQuery {
        ListSessionsQuery {
            offering_id: None,
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }

    #[test]
    fn rejects_month_out_of_range() {
        let err = query(2024, 13, 1).not_before().unwrap_err();
        assert_eq!(err.field(), "month");
    }

    #[test]
    fn rejects_day_out_of_range() {
        let err = query(2024, 1, 0).not_before().unwrap_err();
        assert_eq!(err.field(), "day");
    }

    #[test]
    fn rejects_impossible_date() {
        let err = query(2025, 2, 30).not_before().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn missing_parts_default_to_today() {
        let today = Utc::now().date_naive();
        let bound = ListSessionsQuery::default().not_before().unwrap();
        assert_eq!(bound.as_datetime().date_naive(), today);
    }

    #[tokio::test]
    async fn groups_by_start_time_ascending() {
        let base = Timestamp::start_of_day(2024, 10, 1).unwrap();
        let a = Offering::new(OfferingId::new(), "Iterators", "Kang").unwrap();
        let b = Offering::new(OfferingId::new(), "Closures", "Oh").unwrap();
        let c = Offering::new(OfferingId::new(), "Pinning", "Ahn").unwrap();
        let store = store_with(&[
            (&a, base.add_hours(14)),
            (&b, base.add_hours(10)),
            (&c, base.add_hours(14)),
        ])
        .await;

        let schedule = ListSessionsHandler::new(store)
            .handle(query(2024, 10, 1))
            .await
            .unwrap();

        let keys: Vec<_> = schedule.keys().copied().collect();
        assert_eq!(keys, vec![base.add_hours(10), base.add_hours(14)]);
        assert_eq!(schedule[&base.add_hours(14)].len(), 2);
        assert_eq!(schedule[&base.add_hours(10)][0].offering_name, "Closures");
    }

    #[tokio::test]
    async fn excludes_sessions_before_the_day() {
        let base = Timestamp::start_of_day(2024, 10, 1).unwrap();
        let a = Offering::new(OfferingId::new(), "Iterators", "Kang").unwrap();
        let store = store_with(&[(&a, base.add_hours(-1)), (&a, base.add_days(1))]).await;

        let schedule = ListSessionsHandler::new(store)
            .handle(query(2024, 10, 1))
            .await
            .unwrap();

        assert_eq!(schedule.len(), 1);
        assert!(schedule.contains_key(&base.add_days(1)));
    }

    #[tokio::test]
    async fn filters_by_offering() {
        let base = Timestamp::start_of_day(2024, 10, 1).unwrap();
        let a = Offering::new(OfferingId::new(), "Iterators", "Kang").unwrap();
        let b = Offering::new(OfferingId::new(), "Closures", "Oh").unwrap();
        let store = store_with(&[(&a, base.add_hours(9)), (&b, base.add_hours(11))]).await;

        let mut q = query(2024, 10, 1);
        q.offering_id = Some(*b.id());
        let schedule = ListSessionsHandler::new(store).handle(q).await.unwrap();

        let all: Vec<_> = schedule.values().flatten().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].offering_id, *b.id());
        assert_eq!(all[0].presenter_name, "Oh");
    }

    #[tokio::test]
    async fn reports_seat_status_from_occupancy() {
        let base = Timestamp::start_of_day(2024, 10, 1).unwrap();
        let offering = Offering::new(OfferingId::new(), "Traits", "Baek").unwrap();
        let store = Arc::new(InMemoryRegistrationStore::new());
        store.add_offering(offering.clone()).await;
        store
            .add_session(Session::reconstitute(
                SessionId::new(),
                *offering.id(),
                base.add_hours(9),
                2,
                2,
            ))
            .await
            .unwrap();
        store
            .add_session(Session::reconstitute(
                SessionId::new(),
                *offering.id(),
                base.add_hours(13),
                5,
                3,
            ))
            .await
            .unwrap();

        let schedule = ListSessionsHandler::new(store)
            .handle(query(2024, 10, 1))
            .await
            .unwrap();

        let morning = &schedule[&base.add_hours(9)][0];
        assert_eq!(morning.status, SeatStatus::Full);
        assert_eq!(morning.remaining_seats, 0);
        let afternoon = &schedule[&base.add_hours(13)][0];
        assert_eq!(afternoon.status, SeatStatus::Open);
        assert_eq!(afternoon.remaining_seats, 2);
    }

    #[tokio::test]
    async fn invalid_date_is_validation_failure() {
        let store = Arc::new(InMemoryRegistrationStore::new());
        let result = ListSessionsHandler::new(store)
            .handle(query(2024, 0, 1))
            .await;
        assert!(matches!(
            result,
            Err(RegistrationError::ValidationFailed { ref field, .. }) if field == "month"
        ));
    }
}
