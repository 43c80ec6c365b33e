//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use crate::ports::UserDirectory;

/// Users held in a map, seeded through [`InMemoryUserDirectory::add_user`].
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(*user.id(), user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_added_user() {
        let directory = InMemoryUserDirectory::new();
        let user = User::new(UserId::new(), "Kim").unwrap();
        directory.add_user(user.clone()).await;

        let found = directory.find_user(user.id()).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let directory = InMemoryUserDirectory::new();
        assert!(directory.find_user(&UserId::new()).await.unwrap().is_none());
    }
}
