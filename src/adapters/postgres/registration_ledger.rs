//! PostgreSQL implementation of RegistrationLedger.
//!
//! An admission section is one transaction that starts by locking the
//! offering row with `SELECT ... FOR UPDATE`. Concurrent sections for the
//! same offering queue on that row lock; other offerings are unaffected.
//! Dropping the section without committing rolls the transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::rows::{row_to_registration, row_to_session, to_column, SESSION_COLUMNS};
use crate::domain::foundation::{DomainError, ErrorCode, OfferingId, SessionId, UserId};
use crate::domain::lecture::{Registration, Session};
use crate::ports::{AdmissionSection, RegistrationLedger};

/// Registration ledger backed by the `registrations` table.
#[derive(Clone)]
pub struct PostgresRegistrationLedger {
    pool: PgPool,
}

impl PostgresRegistrationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationLedger for PostgresRegistrationLedger {
    async fn begin_admission(
        &self,
        offering_id: &OfferingId,
    ) -> Result<Box<dyn AdmissionSection>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))?;

        let locked = sqlx::query("SELECT id FROM offerings WHERE id = $1 FOR UPDATE")
            .bind(offering_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::database("lock offering", e))?;

        if locked.is_none() {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("roll back transaction", e))?;
            return Err(DomainError::new(
                ErrorCode::OfferingNotFound,
                format!("Offering not found: {}", offering_id),
            ));
        }

        Ok(Box::new(PostgresAdmissionSection {
            offering_id: *offering_id,
            tx: Some(tx),
        }))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Registration>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.user_id, r.session_id, r.offering_id, r.registered_at
            FROM registrations r
            JOIN sessions s ON s.id = r.session_id
            WHERE r.user_id = $1
            ORDER BY s.starts_at DESC, r.registered_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("fetch registrations", e))?;

        rows.into_iter().map(row_to_registration).collect()
    }
}

/// Open transaction holding the offering row lock.
struct PostgresAdmissionSection {
    offering_id: OfferingId,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresAdmissionSection {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, DomainError> {
        self.tx.as_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Admission section already closed")
        })
    }
}

#[async_trait]
impl AdmissionSection for PostgresAdmissionSection {
    fn offering_id(&self) -> &OfferingId {
        &self.offering_id
    }

    async fn load_session(
        &mut self,
        session_id: &SessionId,
    ) -> Result<Option<Session>, DomainError> {
        let offering_id = *self.offering_id.as_uuid();
        let tx = self.tx()?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1 AND offering_id = $2",
            SESSION_COLUMNS
        ))
        .bind(session_id.as_uuid())
        .bind(offering_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::database("fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn exists(&mut self, user_id: &UserId) -> Result<bool, DomainError> {
        let offering_id = *self.offering_id.as_uuid();
        let tx = self.tx()?;

        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE user_id = $1 AND offering_id = $2)",
        )
        .bind(user_id.as_uuid())
        .bind(offering_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| DomainError::database("check registration", e))?;

        Ok(exists)
    }

    async fn append(
        &mut self,
        user_id: &UserId,
        session: &Session,
    ) -> Result<Registration, DomainError> {
        if session.offering_id() != &self.offering_id {
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
        let tx = self.tx()?;

        sqlx::query(
            r#"
            INSERT INTO registrations (id, user_id, session_id, offering_id, registered_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(registration.id().as_uuid())
        .bind(registration.user_id().as_uuid())
        .bind(registration.session_id().as_uuid())
        .bind(registration.offering_id().as_uuid())
        .bind(registration.registered_at().as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::database("insert registration", e))?;

        Ok(registration)
    }

    async fn store_occupancy(&mut self, session: &Session) -> Result<(), DomainError> {
        let offering_id = *self.offering_id.as_uuid();
        let occupancy = to_column(session.occupancy())?;
        let tx = self.tx()?;

        let result = sqlx::query(
            r#"
            UPDATE sessions SET occupancy = $2
            WHERE id = $1
              AND offering_id = $3
              AND $2 <= capacity
              AND $2 >= occupancy
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(occupancy)
        .bind(offering_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::database("update occupancy", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Occupancy {} rejected for session {}",
                    session.occupancy(),
                    session.id()
                ),
            ));
        }

        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self.tx.take().ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Admission section already closed")
        })?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database("commit transaction", e))
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        match self.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| DomainError::database("roll back transaction", e)),
            None => Ok(()),
        }
    }
}
