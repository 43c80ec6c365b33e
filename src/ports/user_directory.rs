//! User directory port.
//!
//! Users are managed elsewhere; registration only needs to resolve them.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use async_trait::async_trait;

/// Read-only lookup of registered users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by ID.
    ///
    /// Returns `None` if not found.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn UserDirectory) {}
    }
}
