//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::row_to_user;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use crate::ports::UserDirectory;

/// Reads users from the `users` table.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("fetch user", e))?;

        row.map(row_to_user).transpose()
    }
}
