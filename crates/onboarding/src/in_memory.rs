//! In-memory collaborators.
//!
//! Intended for tests/dev. State lives behind `RwLock`s; every call is
//! answered synchronously.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::{ExposeSecret, SecretString};

use opsconsole_accounts::{
    AccountStatus, ActivationSettings, Company, PersistedUser, Role, TemporaryCredential,
    UserDetails,
};
use opsconsole_core::{CompanyId, UserId};

use crate::config::{MIN_SECRET_LEN, OnboardingConfig};
use crate::gateway::{CompanyDirectory, GatewayError, RoleDirectory, UserRegistry};

fn poisoned() -> GatewayError {
    GatewayError::Unavailable("lock poisoned".to_string())
}

fn expiry_out_of_range() -> GatewayError {
    GatewayError::rejected(500, "credential expiry out of range")
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference data
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct DirectoryState {
    companies: Vec<Company>,
    roles: Vec<Role>,
    unavailable: bool,
}

/// Company and role master data.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(self, company: Company) -> Self {
        match self.state.write() {
            Ok(mut state) => state.companies.push(company),
            Err(_) => tracing::warn!(company = %company.name, "directory lock poisoned; company not added"),
        }
        self
    }

    pub fn with_role(self, role: Role) -> Self {
        match self.state.write() {
            Ok(mut state) => state.roles.push(role),
            Err(_) => tracing::warn!(role = %role.name, "directory lock poisoned; role not added"),
        }
        self
    }

    /// Make every subsequent call fail with [`GatewayError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        match self.state.write() {
            Ok(mut state) => state.unavailable = unavailable,
            Err(_) => tracing::warn!(unavailable, "directory lock poisoned; availability unchanged"),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, DirectoryState>, GatewayError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if state.unavailable {
            return Err(GatewayError::Unavailable("directory offline".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl CompanyDirectory for InMemoryDirectory {
    async fn list(&self, active_only: bool) -> Result<Vec<Company>, GatewayError> {
        let state = self.read()?;
        Ok(state
            .companies
            .iter()
            .filter(|c| !active_only || c.status.is_active())
            .cloned()
            .collect())
    }

    async fn get(&self, id: CompanyId) -> Result<Company, GatewayError> {
        let state = self.read()?;
        state
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }
}

#[async_trait]
impl RoleDirectory for InMemoryDirectory {
    async fn list(
        &self,
        company_id: Option<CompanyId>,
        active_only: bool,
    ) -> Result<Vec<Role>, GatewayError> {
        let state = self.read()?;
        Ok(state
            .roles
            .iter()
            .filter(|r| company_id.is_none_or(|id| r.belongs_to(id)))
            .filter(|r| !active_only || r.status.is_active())
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// The only copy of an issued secret the registry keeps.
#[derive(Debug)]
struct IssuedSecret {
    secret: SecretString,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct RegistryState {
    users: HashMap<UserId, PersistedUser>,
    credentials: HashMap<UserId, IssuedSecret>,
    rejections: VecDeque<GatewayError>,
}

impl RegistryState {
    fn take_rejection(&mut self) -> Result<(), GatewayError> {
        match self.rejections.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut PersistedUser, GatewayError> {
        self.users.get_mut(&id).ok_or(GatewayError::NotFound)
    }

    fn name_taken(&self, user_name: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|u| {
            Some(u.id) != except && u.details.user_name.eq_ignore_ascii_case(user_name)
        })
    }
}

/// User registry that issues and verifies temporary credentials.
///
/// Issuing a credential replaces the previous one for that user, so only the
/// latest secret ever verifies.
#[derive(Debug, Default)]
pub struct InMemoryUserRegistry {
    config: OnboardingConfig,
    state: RwLock<RegistryState>,
}

impl InMemoryUserRegistry {
    pub fn new(config: OnboardingConfig) -> Self {
        Self {
            config,
            state: RwLock::default(),
        }
    }

    /// Store `user` as if it had been created earlier.
    pub fn insert(&self, user: PersistedUser) {
        match self.state.write() {
            Ok(mut state) => {
                state.users.insert(user.id, user);
            }
            Err(_) => tracing::warn!(user_id = %user.id, "registry lock poisoned; user not inserted"),
        }
    }

    /// Fail the next call, whatever it is, with `err`.
    pub fn reject_next(&self, err: GatewayError) {
        match self.state.write() {
            Ok(mut state) => state.rejections.push_back(err),
            Err(_) => tracing::warn!(%err, "registry lock poisoned; rejection not queued"),
        }
    }

    pub fn user_count(&self) -> usize {
        self.state.read().map(|s| s.users.len()).unwrap_or(0)
    }

    /// Whether `secret` is the latest credential issued for `id` and has
    /// not expired at `now`.
    pub fn verify_temporary_secret(&self, id: UserId, secret: &str, now: DateTime<Utc>) -> bool {
        let Ok(state) = self.state.read() else {
            return false;
        };
        state
            .credentials
            .get(&id)
            .is_some_and(|issued| issued.secret.expose_secret() == secret && now < issued.expires_at)
    }

    fn generate_secret(&self, previous: Option<&str>) -> String {
        loop {
            let secret: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(self.config.temp_secret_len.max(MIN_SECRET_LEN))
                .map(char::from)
                .collect();
            if previous != Some(secret.as_str()) {
                return secret;
            }
        }
    }

    /// Issue a fresh credential, superseding any earlier one. The new expiry
    /// is always later than the superseded one.
    fn issue(
        &self,
        state: &mut RegistryState,
        user_id: UserId,
        user_name: &str,
    ) -> Result<TemporaryCredential, GatewayError> {
        let previous = state.credentials.get(&user_id);
        let secret = self.generate_secret(previous.map(|p| p.secret.expose_secret()));

        let mut expires_at = Utc::now()
            .checked_add_signed(self.config.credential_ttl())
            .ok_or_else(expiry_out_of_range)?;
        if let Some(prev) = previous {
            if expires_at <= prev.expires_at {
                expires_at = prev
                    .expires_at
                    .checked_add_signed(Duration::milliseconds(1))
                    .ok_or_else(expiry_out_of_range)?;
            }
        }

        state.credentials.insert(
            user_id,
            IssuedSecret {
                secret: SecretString::from(secret.as_str()),
                expires_at,
            },
        );
        Ok(TemporaryCredential::new(user_id, user_name, secret, expires_at, true))
    }

    fn change_status(user: &mut PersistedUser, to: AccountStatus) -> Result<(), GatewayError> {
        let next = user
            .details
            .status
            .transition(to)
            .map_err(|e| GatewayError::rejected(422, e.to_string()))?;
        user.details.status = next;
        user.updated_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn get_by_id(&self, id: UserId) -> Result<PersistedUser, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        state.users.get(&id).cloned().ok_or(GatewayError::NotFound)
    }

    async fn get_by_username(&self, user_name: &str) -> Result<PersistedUser, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        state
            .users
            .values()
            .find(|u| u.details.user_name.eq_ignore_ascii_case(user_name))
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn create(&self, payload: UserDetails) -> Result<PersistedUser, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        if state.name_taken(&payload.user_name, None) {
            return Err(GatewayError::rejected(409, "user name already exists"));
        }

        let mut user = PersistedUser::new(UserId::new(), payload);
        user.updated_at = Some(Utc::now());
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_complete(
        &self,
        id: UserId,
        payload: UserDetails,
    ) -> Result<PersistedUser, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        if state.name_taken(&payload.user_name, Some(id)) {
            return Err(GatewayError::rejected(409, "user name already exists"));
        }

        let user = state.user_mut(id)?;
        let status = user
            .details
            .status
            .transition(payload.status)
            .map_err(|e| GatewayError::rejected(422, e.to_string()))?;
        user.details = UserDetails { status, ..payload };
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        state.users.remove(&id).ok_or(GatewayError::NotFound)?;
        state.credentials.remove(&id);
        Ok(())
    }

    async fn activate(
        &self,
        id: UserId,
        settings: ActivationSettings,
    ) -> Result<Option<TemporaryCredential>, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;

        let user = state.user_mut(id)?;
        let status = user
            .details
            .status
            .transition(AccountStatus::Active)
            .map_err(|e| GatewayError::rejected(422, e.to_string()))?;
        let user_name = user.details.user_name.clone();

        let credential = if settings.password_enabled {
            Some(self.issue(&mut state, id, &user_name)?)
        } else {
            None
        };

        let user = state.user_mut(id)?;
        user.details.status = status;
        user.details.settings = settings;
        user.updated_at = Some(Utc::now());
        Ok(credential)
    }

    async fn deactivate(&self, id: UserId) -> Result<(), GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        let user = state.user_mut(id)?;
        Self::change_status(user, AccountStatus::Inactive)
    }

    async fn reset_password(&self, id: UserId) -> Result<TemporaryCredential, GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.take_rejection()?;
        let user_name = state.user_mut(id)?.details.user_name.clone();
        self.issue(&mut state, id, &user_name)
    }
}
