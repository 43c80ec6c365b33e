//! RegisterForSessionHandler - Command handler for claiming a seat.

use std::sync::Arc;

use serde::Serialize;

use crate::application::AdmissionController;
use crate::domain::foundation::{RegistrationId, SessionId, Timestamp, UserId};
use crate::domain::lecture::RegistrationError;
use crate::ports::{SessionStore, UserDirectory};

/// Command to register a user for a session.
#[derive(Debug, Clone)]
pub struct RegisterForSessionCommand {
    pub user_id: UserId,
    pub session_id: SessionId,
}

/// Confirmation returned after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    pub registration_id: RegistrationId,
    pub session_id: SessionId,
    pub offering_name: String,
    pub presenter_name: String,
    pub user_name: String,
    pub registered_at: Timestamp,
}

/// Handler for seat registration.
pub struct RegisterForSessionHandler {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    admission: Arc<AdmissionController>,
}

impl RegisterForSessionHandler {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        admission: Arc<AdmissionController>,
    ) -> Self {
        Self {
            users,
            sessions,
            admission,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterForSessionCommand,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        // 1. Resolve user
        let user = self
            .users
            .find_user(&cmd.user_id)
            .await?
            .ok_or_else(|| RegistrationError::user_not_found(cmd.user_id))?;

        // 2. Resolve session and its offering (snapshot; admission re-reads)
        let session = self
            .sessions
            .find_session(&cmd.session_id)
            .await?
            .ok_or_else(|| RegistrationError::session_not_found(cmd.session_id))?;

        let offering = self
            .sessions
            .find_offering(session.offering_id())
            .await?
            .ok_or_else(|| RegistrationError::session_not_found(cmd.session_id))?;

        // 3. Admit under the offering's exclusive section
        let registration = self.admission.try_register(user.id(), &session).await?;

        Ok(RegistrationReceipt {
            registration_id: *registration.id(),
            session_id: *registration.session_id(),
            offering_name: offering.name().to_string(),
            presenter_name: offering.presenter().to_string(),
            user_name: user.name().to_string(),
            registered_at: *registration.registered_at(),
        })
    }
}
