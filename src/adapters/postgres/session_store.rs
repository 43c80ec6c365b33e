//! PostgreSQL implementation of SessionStore.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{row_to_offering, row_to_session, SESSION_COLUMNS};
use crate::domain::foundation::{DomainError, OfferingId, SessionId, Timestamp};
use crate::domain::lecture::{Offering, Session};
use crate::ports::SessionStore;

/// Reads offerings and sessions.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn find_offering(&self, id: &OfferingId) -> Result<Option<Offering>, DomainError> {
        let row = sqlx::query("SELECT id, name, presenter FROM offerings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("fetch offering", e))?;

        row.map(row_to_offering).transpose()
    }

    async fn find_sessions_matching(
        &self,
        offering_id: Option<&OfferingId>,
        not_before: Option<&Timestamp>,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM sessions
            WHERE ($1::uuid IS NULL OR offering_id = $1)
              AND ($2::timestamptz IS NULL OR starts_at >= $2)
            ORDER BY starts_at DESC
            "#,
            SESSION_COLUMNS
        ))
        .bind(offering_id.map(|id| *id.as_uuid()))
        .bind(not_before.map(|ts| *ts.as_datetime()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("fetch sessions", e))?;

        rows.into_iter().map(row_to_session).collect()
    }
}
