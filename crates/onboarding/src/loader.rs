//! Reference data loading (companies, then roles).
//!
//! Roles are only fetched once the company fetch has completed. Each request
//! is tagged with an [`Epoch`]; a response is applied only if no newer
//! request for the same resource has been started since.

use opsconsole_accounts::{Company, Role};
use opsconsole_core::CompanyId;

use crate::gateway::{CompanyDirectory, GatewayError, RoleDirectory};

/// Monotonically increasing request tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out epochs for one resource and remembers the latest one.
#[derive(Debug, Default)]
struct EpochGate {
    latest: u64,
    in_flight: bool,
}

impl EpochGate {
    fn begin(&mut self) -> Epoch {
        self.latest += 1;
        self.in_flight = true;
        Epoch(self.latest)
    }

    /// Accept a response tagged `epoch` if it answers the latest request.
    fn accept(&mut self, epoch: Epoch) -> bool {
        if epoch.0 != self.latest {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Mark the latest request as finished without data.
    fn abandon(&mut self, epoch: Epoch) {
        if epoch.0 == self.latest {
            self.in_flight = false;
        }
    }
}

/// Effect of applying a role response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSnapshot {
    /// A newer request superseded this one; nothing was applied.
    Stale,
    Unchanged,
    /// The role collection changed; displayed rows need reconciling.
    Changed,
}

impl RoleSnapshot {
    pub fn needs_reconcile(self) -> bool {
        self == RoleSnapshot::Changed
    }
}

/// Holds the reference data the wizard and user list resolve against.
#[derive(Debug, Default)]
pub struct ReferenceLoader {
    companies: Vec<Company>,
    roles: Vec<Role>,
    companies_loaded: bool,
    company_gate: EpochGate,
    role_gate: EpochGate,
}

impl ReferenceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Loaded roles; empty until the first role response lands.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn companies_loaded(&self) -> bool {
        self.companies_loaded
    }

    pub fn begin_companies(&mut self) -> Epoch {
        self.company_gate.begin()
    }

    /// Apply a company response. Returns `false` if it was stale.
    pub fn apply_companies(&mut self, epoch: Epoch, companies: Vec<Company>) -> bool {
        if !self.company_gate.accept(epoch) {
            tracing::debug!(epoch = epoch.value(), "discarding stale company response");
            return false;
        }
        self.companies = companies;
        self.companies_loaded = true;
        true
    }

    /// Start a role request. Returns `None` while companies are not loaded
    /// or a company request is still outstanding.
    pub fn begin_roles(&mut self) -> Option<Epoch> {
        if !self.companies_loaded || self.company_gate.in_flight {
            tracing::debug!("role fetch deferred until companies are loaded");
            return None;
        }
        Some(self.role_gate.begin())
    }

    pub fn apply_roles(&mut self, epoch: Epoch, roles: Vec<Role>) -> RoleSnapshot {
        if !self.role_gate.accept(epoch) {
            tracing::debug!(epoch = epoch.value(), "discarding stale role response");
            return RoleSnapshot::Stale;
        }
        if self.roles == roles {
            return RoleSnapshot::Unchanged;
        }
        self.roles = roles;
        RoleSnapshot::Changed
    }

    /// Fetch companies, then roles. Failures are returned as-is and leave the
    /// previously loaded data in place; nothing is retried.
    pub async fn load<C, R>(
        &mut self,
        companies: &C,
        roles: &R,
        company_scope: Option<CompanyId>,
    ) -> Result<RoleSnapshot, GatewayError>
    where
        C: CompanyDirectory + ?Sized,
        R: RoleDirectory + ?Sized,
    {
        let epoch = self.begin_companies();
        match companies.list(true).await {
            Ok(list) => {
                self.apply_companies(epoch, list);
            }
            Err(err) => {
                self.company_gate.abandon(epoch);
                tracing::warn!("company fetch failed: {err}");
                return Err(err);
            }
        }
        self.reload_roles(roles, company_scope).await
    }

    /// Re-fetch roles only, e.g. after the selected company changed.
    pub async fn reload_roles<R>(
        &mut self,
        roles: &R,
        company_scope: Option<CompanyId>,
    ) -> Result<RoleSnapshot, GatewayError>
    where
        R: RoleDirectory + ?Sized,
    {
        let Some(epoch) = self.begin_roles() else {
            return Ok(RoleSnapshot::Stale);
        };
        match roles.list(company_scope, true).await {
            Ok(list) => Ok(self.apply_roles(epoch, list)),
            Err(err) => {
                self.role_gate.abandon(epoch);
                tracing::warn!("role fetch failed: {err}");
                Err(err)
            }
        }
    }
}
