//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresUserDirectory` - User lookups
//! - `PostgresSessionStore` - Offering and session reads
//! - `PostgresRegistrationLedger` - Registrations and row-locked admission
//!
//! Schema lives in `migrations/`; apply with [`run_migrations`].

mod registration_ledger;
mod rows;
mod session_store;
mod user_directory;

pub use registration_ledger::PostgresRegistrationLedger;
pub use session_store::PostgresSessionStore;
pub use user_directory::PostgresUserDirectory;

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("run migrations", e))
}
