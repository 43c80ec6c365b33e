//! ListUserRegistrationsHandler - Query handler for a user's registration history.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{OfferingId, Timestamp, UserId};
use crate::domain::lecture::{Offering, RegistrationError};
use crate::ports::{RegistrationLedger, SessionStore, UserDirectory};

/// Query for every registration a user holds.
#[derive(Debug, Clone)]
pub struct ListUserRegistrationsQuery {
    pub user_id: UserId,
}

/// One registered lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationHistoryEntry {
    pub offering_name: String,
    pub presenter_name: String,
    pub starts_at: Timestamp,
    pub registered_at: Timestamp,
}

/// A user's registrations, latest session first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationHistory {
    pub user_name: String,
    pub entries: Vec<RegistrationHistoryEntry>,
}

/// Handler for registration history.
pub struct ListUserRegistrationsHandler {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<dyn RegistrationLedger>,
}

impl ListUserRegistrationsHandler {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        ledger: Arc<dyn RegistrationLedger>,
    ) -> Self {
        Self {
            users,
            sessions,
            ledger,
        }
    }

    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    /// - `NoRegistrations` if the user never registered
    pub async fn handle(
        &self,
        query: ListUserRegistrationsQuery,
    ) -> Result<RegistrationHistory, RegistrationError> {
        let user = self
            .users
            .find_user(&query.user_id)
            .await?
            .ok_or_else(|| RegistrationError::user_not_found(query.user_id))?;

        let registrations = self.ledger.list_by_user(&query.user_id).await?;
        if registrations.is_empty() {
            return Err(RegistrationError::no_registrations(query.user_id));
        }

        let mut offerings: HashMap<OfferingId, Offering> = HashMap::new();
        let mut entries = Vec::with_capacity(registrations.len());

        for registration in registrations {
            let session = self
                .sessions
                .find_session(registration.session_id())
                .await?
                .ok_or_else(|| {
                    RegistrationError::infrastructure(format!(
                        "Registration {} references missing session {}",
                        registration.id(),
                        registration.session_id()
                    ))
                })?;

            let offering_id = *registration.offering_id();
            if !offerings.contains_key(&offering_id) {
                let offering = self
                    .sessions
                    .find_offering(&offering_id)
                    .await?
                    .ok_or_else(|| {
                        RegistrationError::infrastructure(format!(
                            "Registration {} references missing offering {}",
                            registration.id(),
                            offering_id
                        ))
                    })?;
                offerings.insert(offering_id, offering);
            }
            let offering = &offerings[&offering_id];

            entries.push(RegistrationHistoryEntry {
                offering_name: offering.name().to_string(),
                presenter_name: offering.presenter().to_string(),
                starts_at: *session.starts_at(),
                registered_at: *registration.registered_at(),
            });
        }

        Ok(RegistrationHistory {
            user_name: user.name().to_string(),
            entries,
        })
    }
}
