//! Company/role reference resolution.
//!
//! Records fetched from the backend carry canonical ids while the console
//! shows names. Resolution runs in both directions:
//!
//! - **Display** (id → name): [`resolve_role_display`] and [`reconcile`]. Role
//!   data arrives after company data, so a role cell starts out pending and is
//!   filled in by a single reconciliation pass once roles are loaded.
//! - **Write** (name → id): [`resolve_role_id`] and
//!   [`resolve_company_id`]. Role assignment is optional, so
//!   an unresolved role is left out of the payload; an unresolved company is
//!   an error.
//! - **Read with degradation**: [`IdentityResolver::resolve_company`] and
//!   [`IdentityResolver::resolve_own_profile`] fall back to what the operator's
//!   session already knows and raise a non-blocking notice.

use opsconsole_accounts::{
    AccountStatus, Company, CompanyProjection, PersistedUser, ProfileProjection, Role, Session,
    scoped_to,
};
use opsconsole_core::{
    CompanyId, CompanyRef, Reference, RoleId, RoleRef, UserId, find_unique_by_name,
};

use crate::error::{EntityKind, OnboardingError, ResolutionWarning};
use crate::gateway::{CompanyDirectory, UserRegistry};

// ─────────────────────────────────────────────────────────────────────────────
// Display path
// ─────────────────────────────────────────────────────────────────────────────

/// What a role cell currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDisplay {
    /// Roles are not loaded yet; re-resolve once they are.
    Pending,
    Resolved(String),
    /// No role, or a reference that no loaded role matches.
    Unknown,
}

impl RoleDisplay {
    pub fn is_pending(&self) -> bool {
        matches!(self, RoleDisplay::Pending)
    }

    /// Text for the cell; `fallback` stands in for unknown references.
    pub fn label<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            RoleDisplay::Pending => "…",
            RoleDisplay::Resolved(name) => name,
            RoleDisplay::Unknown => fallback,
        }
    }
}

/// Resolve a role reference for display against the loaded role collection.
///
/// An empty collection means roles have not arrived yet and yields
/// [`RoleDisplay::Pending`]. Never fails: ids and names that no loaded role
/// carries render as [`RoleDisplay::Unknown`].
pub fn resolve_role_display(role_ref: Option<&RoleRef>, loaded_roles: &[Role]) -> RoleDisplay {
    if loaded_roles.is_empty() {
        return RoleDisplay::Pending;
    }
    match role_ref {
        None => RoleDisplay::Unknown,
        Some(Reference::ByName(name)) => loaded_roles
            .iter()
            .find(|r| r.name == *name)
            .map(|r| RoleDisplay::Resolved(r.name.clone()))
            .unwrap_or(RoleDisplay::Unknown),
        Some(Reference::ById(id)) => loaded_roles
            .iter()
            .find(|r| r.id == *id)
            .map(|r| RoleDisplay::Resolved(r.name.clone()))
            .unwrap_or(RoleDisplay::Unknown),
    }
}

/// A user row as shown in the user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedRow {
    pub user_id: UserId,
    pub user_name: String,
    pub employee_code: String,
    pub status: AccountStatus,
    pub role_ref: Option<RoleRef>,
    pub role: RoleDisplay,
}

impl DisplayedRow {
    pub fn from_user(user: &PersistedUser, loaded_roles: &[Role]) -> Self {
        let role_ref = user.details.role_id.map(Reference::ById);
        let role = resolve_role_display(role_ref.as_ref(), loaded_roles);
        Self {
            user_id: user.id,
            user_name: user.details.user_name.clone(),
            employee_code: user.details.employee_code.clone(),
            status: user.details.status,
            role_ref,
            role,
        }
    }
}

/// Re-resolve every row against a new role snapshot in one pass.
///
/// Invoke whenever the role snapshot changes; every row is recomputed from
/// its stored reference, not only rows that happen to be rendered next.
pub fn reconcile(rows: &[DisplayedRow], roles: &[Role]) -> Vec<DisplayedRow> {
    rows.iter()
        .map(|row| DisplayedRow {
            role: resolve_role_display(row.role_ref.as_ref(), roles),
            ..row.clone()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Write path
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve a role reference to the canonical id to persist.
///
/// - A canonical id is returned unchanged, so resolving the result again
///   yields the same id. When roles are loaded, an id that no role of
///   `company_id` carries is stale and resolves to `None`.
/// - A name resolves by exact match among the roles of `company_id` only.
/// - `None` means "leave the role out of the payload"; it never fails a save.
pub fn resolve_role_id(reference: &RoleRef, roles: &[Role], company_id: CompanyId) -> Option<RoleId> {
    let scoped = scoped_to(roles, company_id);
    let resolved = match reference {
        Reference::ById(id) if roles.is_empty() => Some(*id),
        Reference::ById(id) => scoped.iter().find(|r| r.id == *id).map(|r| r.id),
        Reference::ByName(name) => scoped.iter().find(|r| r.name == *name).map(|r| r.id),
    };
    if resolved.is_none() {
        tracing::warn!(
            reference = %reference,
            company_id = %company_id,
            "role reference did not resolve; omitting role from payload"
        );
    }
    resolved
}

/// Resolve a company reference to the canonical id to persist.
///
/// Names must match exactly one company; anything else is an
/// [`OnboardingError::UnresolvedIdentity`].
pub fn resolve_company_id(
    reference: &CompanyRef,
    companies: &[Company],
) -> Result<CompanyId, OnboardingError> {
    match reference {
        Reference::ById(id) => Ok(*id),
        Reference::ByName(name) => find_unique_by_name(companies, name)
            .map(|company| company.id)
            .ok_or_else(|| OnboardingError::unresolved(EntityKind::Company, reference)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session-aware resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a company read-path lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyResolution {
    Canonical(Company),
    /// Lookup failed; showing what the session knows.
    Degraded {
        projection: CompanyProjection,
        warning: ResolutionWarning,
    },
}

impl CompanyResolution {
    pub fn projection(&self) -> CompanyProjection {
        match self {
            CompanyResolution::Canonical(company) => CompanyProjection::from(company),
            CompanyResolution::Degraded { projection, .. } => projection.clone(),
        }
    }

    pub fn warning(&self) -> Option<&ResolutionWarning> {
        match self {
            CompanyResolution::Canonical(_) => None,
            CompanyResolution::Degraded { warning, .. } => Some(warning),
        }
    }
}

/// Result of resolving the signed-in operator's own record.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileResolution {
    Canonical(Box<PersistedUser>),
    Degraded {
        projection: ProfileProjection,
        warning: ResolutionWarning,
    },
}

impl ProfileResolution {
    pub fn canonical_id(&self) -> Option<UserId> {
        match self {
            ProfileResolution::Canonical(user) => Some(user.id),
            ProfileResolution::Degraded { .. } => None,
        }
    }
}

/// Resolution that depends on who is signed in.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    session: Session,
}

impl IdentityResolver {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read-path company lookup.
    ///
    /// An id is fetched directly and a name must match exactly one company.
    /// When either lookup fails the session's own company data is shown with
    /// a warning; it is never returned as the canonical answer.
    pub async fn resolve_company<D>(&self, directory: &D, reference: &CompanyRef) -> CompanyResolution
    where
        D: CompanyDirectory + ?Sized,
    {
        match reference {
            Reference::ById(id) => match directory.get(*id).await {
                Ok(company) => return CompanyResolution::Canonical(company),
                Err(err) => tracing::warn!(company_id = %id, "company lookup by id failed: {err}"),
            },
            Reference::ByName(name) if name.trim().is_empty() => {}
            Reference::ByName(name) => match directory.list(false).await {
                Ok(companies) => {
                    if let Some(company) = find_unique_by_name(&companies, name) {
                        return CompanyResolution::Canonical(company.clone());
                    }
                    tracing::warn!(company_name = %name, "no unique company matches name");
                }
                Err(err) => tracing::warn!("company list failed during name lookup: {err}"),
            },
        }

        CompanyResolution::Degraded {
            projection: self.session.company_projection(),
            warning: ResolutionWarning::new(
                EntityKind::Company,
                format!("company details unavailable for {reference}; showing session data"),
            ),
        }
    }

    /// Read-path lookup of the operator's own record: by id, then by user
    /// name, then the session projection with a warning.
    pub async fn resolve_own_profile<R>(&self, registry: &R) -> ProfileResolution
    where
        R: UserRegistry + ?Sized,
    {
        match self.lookup_own(registry).await {
            Some(user) => ProfileResolution::Canonical(Box::new(user)),
            None => ProfileResolution::Degraded {
                projection: self.session.profile_projection(),
                warning: ResolutionWarning::new(
                    EntityKind::User,
                    format!("profile for {} unavailable; showing session data", self.session.user_name),
                ),
            },
        }
    }

    /// Write-path lookup of the operator's own canonical id. Fails instead of
    /// degrading.
    pub async fn require_own_user_id<R>(&self, registry: &R) -> Result<UserId, OnboardingError>
    where
        R: UserRegistry + ?Sized,
    {
        self.lookup_own(registry)
            .await
            .map(|user| user.id)
            .ok_or_else(|| OnboardingError::unresolved(EntityKind::User, &self.session.user_name))
    }

    async fn lookup_own<R>(&self, registry: &R) -> Option<PersistedUser>
    where
        R: UserRegistry + ?Sized,
    {
        if let Some(id) = self.session.principal_id {
            match registry.get_by_id(id).await {
                Ok(user) => return Some(user),
                Err(err) => tracing::warn!(user_id = %id, "own profile lookup by id failed: {err}"),
            }
        }
        if self.session.user_name.trim().is_empty() {
            return None;
        }
        match registry.get_by_username(&self.session.user_name).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(user_name = %self.session.user_name, "own profile lookup by user name failed: {err}");
                None
            }
        }
    }
}
