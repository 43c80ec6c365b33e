//! User entity as seen by lecture registration.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};

/// Maximum length for a user's display name.
pub const MAX_USER_NAME_LENGTH: usize = 100;

/// A user who can register for lecture sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Creates a user, validating the display name.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is blank
    /// - `OutOfRange` if the name is longer than [`MAX_USER_NAME_LENGTH`]
    pub fn new(id: UserId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("user_name"));
        }
        let len = name.chars().count();
        if len > MAX_USER_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "user_name",
                1,
                MAX_USER_NAME_LENGTH as i64,
                len as i64,
            ));
        }
        Ok(Self { id, name })
    }

    /// Returns the user ID.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_user_with_valid_name() {
        let user = User::new(UserId::new(), "Kim Minji").unwrap();
        assert_eq!(user.name(), "Kim Minji");
    }

    #[test]
    fn rejects_blank_name() {
        let result = User::new(UserId::new(), "   ");
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn rejects_overlong_name() {
        let result = User::new(UserId::new(), "x".repeat(MAX_USER_NAME_LENGTH + 1));
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }
}
