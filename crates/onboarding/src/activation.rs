//! Account activation and temporary credential issuance.

use opsconsole_accounts::{
    AccountStatus, ActivationSettings, CredentialReceipt, Session, TemporaryCredential,
};
use opsconsole_core::UserId;
use secrecy::SecretString;

use crate::error::OnboardingError;
use crate::gateway::UserRegistry;
use crate::resolver::IdentityResolver;

/// Result of a successful activation.
#[derive(Debug)]
pub struct ActivationOutcome {
    pub user_id: UserId,
    pub status: AccountStatus,
    pub settings: ActivationSettings,
    /// Present only when password login was enabled.
    pub credential: Option<TemporaryCredential>,
}

/// Drives activation, deactivation and password resets against the
/// registry on behalf of the signed-in operator.
///
/// Nothing is assumed applied unless the registry reports success.
pub struct ActivationManager<R> {
    registry: R,
    session: Session,
}

impl<R> ActivationManager<R>
where
    R: UserRegistry,
{
    pub fn new(registry: R, session: Session) -> Self {
        Self { registry, session }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    #[tracing::instrument(skip(self, settings), fields(operator = %self.session.user_name))]
    pub async fn activate(
        &self,
        user_id: UserId,
        settings: ActivationSettings,
    ) -> Result<ActivationOutcome, OnboardingError> {
        let credential = self.registry.activate(user_id, settings).await?;
        if settings.password_enabled && credential.is_none() {
            tracing::warn!("password login enabled but no temporary credential was issued");
        }
        if let Some(cred) = &credential {
            tracing::info!(expires_at = %cred.expires_at, "account activated; temporary credential issued");
        } else {
            tracing::info!("account activated");
        }
        Ok(ActivationOutcome {
            user_id,
            status: AccountStatus::Active,
            settings,
            credential,
        })
    }

    /// Mark the account Inactive. Outstanding credentials are left alone.
    #[tracing::instrument(skip(self), fields(operator = %self.session.user_name))]
    pub async fn deactivate(&self, user_id: UserId) -> Result<AccountStatus, OnboardingError> {
        self.registry.deactivate(user_id).await?;
        tracing::info!("account deactivated");
        Ok(AccountStatus::Inactive)
    }

    /// Issue a new temporary credential, superseding any earlier one.
    #[tracing::instrument(skip(self), fields(operator = %self.session.user_name))]
    pub async fn reset_password(&self, user_id: UserId) -> Result<TemporaryCredential, OnboardingError> {
        let credential = self.registry.reset_password(user_id).await?;
        tracing::info!(expires_at = %credential.expires_at, "temporary credential reissued");
        Ok(credential)
    }

    /// Reset the signed-in operator's own password. Requires the operator's
    /// canonical id; never falls back to session data.
    pub async fn reset_own_password(&self) -> Result<TemporaryCredential, OnboardingError> {
        let resolver = IdentityResolver::new(self.session.clone());
        let own_id = resolver.require_own_user_id(&self.registry).await?;
        self.reset_password(own_id).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-time display
// ─────────────────────────────────────────────────────────────────────────────

/// A credential's secret, taken out of the slot for its single display.
#[derive(Debug)]
pub struct RevealedCredential {
    pub receipt: CredentialReceipt,
    secret: SecretString,
}

impl RevealedCredential {
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    pub fn into_secret(self) -> SecretString {
        self.secret
    }
}

/// Holds at most one issued credential until the operator acknowledges it.
///
/// The secret can be revealed exactly once. Presenting a newer credential
/// replaces whatever is held.
#[derive(Debug, Default)]
pub struct CredentialSlot {
    held: Option<TemporaryCredential>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `credential`, returning the receipt of any credential it replaced.
    pub fn present(&mut self, credential: TemporaryCredential) -> Option<CredentialReceipt> {
        let replaced = self.held.replace(credential).map(|old| old.receipt());
        if let Some(old) = &replaced {
            tracing::debug!(user_id = %old.user_id, "held credential replaced before acknowledgment");
        }
        replaced
    }

    /// Take the secret for display. `None` once revealed or when empty.
    pub fn reveal(&mut self) -> Option<RevealedCredential> {
        let held = self.held.as_mut()?;
        let secret = held.take_secret()?;
        Some(RevealedCredential {
            receipt: held.receipt(),
            secret,
        })
    }

    /// Clear the slot.
    pub fn acknowledge(&mut self) -> Option<CredentialReceipt> {
        self.held.take().map(|cred| cred.receipt())
    }

    /// A credential is held and its secret has not been shown yet.
    pub fn has_pending(&self) -> bool {
        self.held.as_ref().is_some_and(|cred| !cred.is_revealed())
    }

    pub fn receipt(&self) -> Option<CredentialReceipt> {
        self.held.as_ref().map(TemporaryCredential::receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use secrecy::ExposeSecret;

    fn credential(user_id: UserId, secret: &str) -> TemporaryCredential {
        TemporaryCredential::new(user_id, "ravi.k", secret, Utc::now() + Duration::hours(1), true)
    }

    #[test]
    fn slot_reveals_once() {
        let mut slot = CredentialSlot::new();
        assert!(slot.reveal().is_none());

        slot.present(credential(UserId::new(), "Secret-1"));
        assert!(slot.has_pending());

        let revealed = slot.reveal().unwrap();
        assert_eq!(revealed.secret().expose_secret(), "Secret-1");
        assert!(!format!("{revealed:?}").contains("Secret-1"));

        assert!(slot.reveal().is_none());
        assert!(!slot.has_pending());
        assert!(slot.receipt().is_some());
    }

    #[test]
    fn acknowledge_clears() {
        let mut slot = CredentialSlot::new();
        let user_id = UserId::new();
        slot.present(credential(user_id, "Secret-1"));
        let receipt = slot.acknowledge().unwrap();
        assert_eq!(receipt.user_id, user_id);
        assert!(slot.receipt().is_none());
    }

    #[test]
    fn newer_credential_replaces_held_one() {
        let mut slot = CredentialSlot::new();
        let user_id = UserId::new();
        slot.present(credential(user_id, "Secret-1"));
        let replaced = slot.present(credential(user_id, "Secret-2"));
        assert_eq!(replaced.map(|r| r.user_id), Some(user_id));
        assert_eq!(slot.reveal().unwrap().into_secret().expose_secret(), "Secret-2");
    }
}
