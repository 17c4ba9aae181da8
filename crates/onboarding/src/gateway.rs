//! Collaborator interfaces consumed by the onboarding workflow.
//!
//! The console talks to the backend through these traits only. Transport,
//! timeouts and retries live in whatever implements them; the workflow never
//! retries on its own.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use opsconsole_accounts::{ActivationSettings, Company, PersistedUser, Role, TemporaryCredential, UserDetails};
use opsconsole_core::{CompanyId, UserId};

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered and refused the request. The message is shown to
    /// the operator as-is.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    #[error("record not found")]
    NotFound,

    /// The backend could not be reached or did not answer.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Company master data.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn list(&self, active_only: bool) -> Result<Vec<Company>, GatewayError>;

    async fn get(&self, id: CompanyId) -> Result<Company, GatewayError>;
}

/// Role master data.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// List roles, optionally restricted to one owning company.
    async fn list(
        &self,
        company_id: Option<CompanyId>,
        active_only: bool,
    ) -> Result<Vec<Role>, GatewayError>;
}

/// User accounts and their lifecycle operations.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<PersistedUser, GatewayError>;

    async fn get_by_username(&self, user_name: &str) -> Result<PersistedUser, GatewayError>;

    async fn create(&self, payload: UserDetails) -> Result<PersistedUser, GatewayError>;

    /// Replace every field of an existing user.
    async fn update_complete(
        &self,
        id: UserId,
        payload: UserDetails,
    ) -> Result<PersistedUser, GatewayError>;

    async fn delete(&self, id: UserId) -> Result<(), GatewayError>;

    /// Apply access toggles and mark the account Active. Returns a fresh
    /// temporary credential when `settings.password_enabled` is set.
    async fn activate(
        &self,
        id: UserId,
        settings: ActivationSettings,
    ) -> Result<Option<TemporaryCredential>, GatewayError>;

    async fn deactivate(&self, id: UserId) -> Result<(), GatewayError>;

    /// Issue a new temporary credential, superseding any outstanding one.
    async fn reset_password(&self, id: UserId) -> Result<TemporaryCredential, GatewayError>;
}

#[async_trait]
impl<S> UserRegistry for Arc<S>
where
    S: UserRegistry + ?Sized,
{
    async fn get_by_id(&self, id: UserId) -> Result<PersistedUser, GatewayError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_username(&self, user_name: &str) -> Result<PersistedUser, GatewayError> {
        (**self).get_by_username(user_name).await
    }

    async fn create(&self, payload: UserDetails) -> Result<PersistedUser, GatewayError> {
        (**self).create(payload).await
    }

    async fn update_complete(
        &self,
        id: UserId,
        payload: UserDetails,
    ) -> Result<PersistedUser, GatewayError> {
        (**self).update_complete(id, payload).await
    }

    async fn delete(&self, id: UserId) -> Result<(), GatewayError> {
        (**self).delete(id).await
    }

    async fn activate(
        &self,
        id: UserId,
        settings: ActivationSettings,
    ) -> Result<Option<TemporaryCredential>, GatewayError> {
        (**self).activate(id, settings).await
    }

    async fn deactivate(&self, id: UserId) -> Result<(), GatewayError> {
        (**self).deactivate(id).await
    }

    async fn reset_password(&self, id: UserId) -> Result<TemporaryCredential, GatewayError> {
        (**self).reset_password(id).await
    }
}
