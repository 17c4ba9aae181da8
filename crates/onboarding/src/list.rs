//! User list with role display cells and row actions.

use opsconsole_accounts::{AccountStatus, ActivationSettings, PersistedUser, Role};
use opsconsole_core::UserId;

use crate::activation::{ActivationManager, CredentialSlot};
use crate::error::OnboardingError;
use crate::gateway::UserRegistry;
use crate::resolver::{DisplayedRow, reconcile};

#[derive(Debug, Clone)]
pub struct UserList {
    rows: Vec<DisplayedRow>,
    roles: Vec<Role>,
    fallback_label: String,
}

impl UserList {
    /// Build rows against whatever roles are loaded so far; with none loaded,
    /// every role cell starts out pending.
    pub fn from_users(users: &[PersistedUser], roles: &[Role], fallback_label: impl Into<String>) -> Self {
        Self {
            rows: users.iter().map(|u| DisplayedRow::from_user(u, roles)).collect(),
            roles: roles.to_vec(),
            fallback_label: fallback_label.into(),
        }
    }

    pub fn rows(&self) -> &[DisplayedRow] {
        &self.rows
    }

    pub fn row(&self, user_id: UserId) -> Option<&DisplayedRow> {
        self.rows.iter().find(|r| r.user_id == user_id)
    }

    /// Text shown in a row's role cell.
    pub fn role_label<'a>(&'a self, row: &'a DisplayedRow) -> &'a str {
        row.role.label(&self.fallback_label)
    }

    /// Re-resolve every row against a new role snapshot.
    pub fn apply_role_snapshot(&mut self, roles: &[Role]) {
        self.roles = roles.to_vec();
        self.rows = reconcile(&self.rows, &self.roles);
        tracing::debug!(rows = self.rows.len(), roles = self.roles.len(), "role cells reconciled");
    }

    /// Insert or replace the row for `user`.
    pub fn upsert(&mut self, user: &PersistedUser) {
        let row = DisplayedRow::from_user(user, &self.roles);
        match self.rows.iter_mut().find(|r| r.user_id == user.id) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    pub fn remove(&mut self, user_id: UserId) -> Option<DisplayedRow> {
        let idx = self.rows.iter().position(|r| r.user_id == user_id)?;
        Some(self.rows.remove(idx))
    }

    fn set_status(&mut self, user_id: UserId, status: AccountStatus) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.user_id == user_id) {
            row.status = status;
        }
    }

    // ── Row actions ──────────────────────────────────────────────────────────
    //
    // The row only changes after the backend confirms.

    pub async fn activate<R: UserRegistry>(
        &mut self,
        manager: &ActivationManager<R>,
        user_id: UserId,
        settings: ActivationSettings,
        slot: &mut CredentialSlot,
    ) -> Result<(), OnboardingError> {
        let outcome = manager.activate(user_id, settings).await?;
        self.set_status(user_id, outcome.status);
        if let Some(credential) = outcome.credential {
            slot.present(credential);
        }
        Ok(())
    }

    pub async fn deactivate<R: UserRegistry>(
        &mut self,
        manager: &ActivationManager<R>,
        user_id: UserId,
    ) -> Result<(), OnboardingError> {
        let status = manager.deactivate(user_id).await?;
        self.set_status(user_id, status);
        Ok(())
    }

    pub async fn reset_password<R: UserRegistry>(
        &self,
        manager: &ActivationManager<R>,
        user_id: UserId,
        slot: &mut CredentialSlot,
    ) -> Result<(), OnboardingError> {
        let credential = manager.reset_password(user_id).await?;
        slot.present(credential);
        Ok(())
    }

    pub async fn delete<R: UserRegistry + ?Sized>(
        &mut self,
        registry: &R,
        user_id: UserId,
    ) -> Result<(), OnboardingError> {
        registry.delete(user_id).await?;
        self.remove(user_id);
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}
