//! Row mapping shared by the PostgreSQL adapters.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{
    DomainError, OfferingId, RegistrationId, SessionId, Timestamp, UserId,
};
use crate::domain::lecture::{Offering, Registration, Session};
use crate::domain::user::User;

pub(super) const SESSION_COLUMNS: &str = "id, offering_id, starts_at, capacity, occupancy";

pub(super) fn row_to_user(row: PgRow) -> Result<User, DomainError> {
    let id: uuid::Uuid = get(&row, "id")?;
    let name: String = get(&row, "name")?;
    User::new(UserId::from_uuid(id), name)
        .map_err(|e| DomainError::database("decode user", e))
}

pub(super) fn row_to_offering(row: PgRow) -> Result<Offering, DomainError> {
    let id: uuid::Uuid = get(&row, "id")?;
    let name: String = get(&row, "name")?;
    let presenter: String = get(&row, "presenter")?;
    Offering::new(OfferingId::from_uuid(id), name, presenter)
        .map_err(|e| DomainError::database("decode offering", e))
}

pub(super) fn row_to_session(row: PgRow) -> Result<Session, DomainError> {
    let id: uuid::Uuid = get(&row, "id")?;
    let offering_id: uuid::Uuid = get(&row, "offering_id")?;
    let starts_at: chrono::DateTime<chrono::Utc> = get(&row, "starts_at")?;
    let capacity: i32 = get(&row, "capacity")?;
    let occupancy: i32 = get(&row, "occupancy")?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        OfferingId::from_uuid(offering_id),
        Timestamp::from_datetime(starts_at),
        to_count("capacity", capacity)?,
        to_count("occupancy", occupancy)?,
    ))
}

pub(super) fn row_to_registration(row: PgRow) -> Result<Registration, DomainError> {
    let id: uuid::Uuid = get(&row, "id")?;
    let user_id: uuid::Uuid = get(&row, "user_id")?;
    let session_id: uuid::Uuid = get(&row, "session_id")?;
    let offering_id: uuid::Uuid = get(&row, "offering_id")?;
    let registered_at: chrono::DateTime<chrono::Utc> = get(&row, "registered_at")?;

    Ok(Registration::reconstitute(
        RegistrationId::from_uuid(id),
        UserId::from_uuid(user_id),
        SessionId::from_uuid(session_id),
        OfferingId::from_uuid(offering_id),
        Timestamp::from_datetime(registered_at),
    ))
}

/// Seat counters are stored as INTEGER.
pub(super) fn to_column(count: u32) -> Result<i32, DomainError> {
    i32::try_from(count).map_err(|e| DomainError::database("encode seat count", e))
}

fn to_count(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|e| DomainError::database(&format!("decode {}", column), e))
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(&format!("get {}", column), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn negative_counts_are_rejected() {
        let err = to_count("occupancy", -1).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("occupancy"));
    }

    #[test]
    fn counts_beyond_integer_are_rejected() {
        assert!(to_column(u32::MAX).is_err());
        assert_eq!(to_column(30).unwrap(), 30);
    }
}
