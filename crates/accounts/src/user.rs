//! Persisted user account model.
//!
//! Records here are the canonical shape the backend stores: company and role
//! are held as canonical ids, never as display names, and no credential
//! material is ever part of a user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsconsole_core::{CompanyId, DomainError, DomainResult, RoleId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Account Status
// ─────────────────────────────────────────────────────────────────────────────

/// Account lifecycle status.
///
/// # Invariants
/// - Draft may move to Active or Inactive.
/// - Active and Inactive may move to each other.
/// - Nothing moves back to Draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    /// Created but never activated.
    #[default]
    Draft,
    Active,
    Inactive,
}

impl AccountStatus {
    /// Check a status change and return the resulting status.
    pub fn transition(self, to: AccountStatus) -> DomainResult<AccountStatus> {
        match (self, to) {
            (from, to) if from == to => Ok(to),
            (_, AccountStatus::Draft) => Err(DomainError::invariant(format!(
                "account status cannot move from {self} back to Draft"
            ))),
            (_, to) => Ok(to),
        }
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountStatus::Draft => write!(f, "Draft"),
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field Groups
// ─────────────────────────────────────────────────────────────────────────────

/// Employment category of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    Permanent,
    Contract,
    Temporary,
    ThirdParty,
}

impl EmploymentType {
    /// Contract staff must name their contractor.
    pub fn requires_contractor(self) -> bool {
        self == EmploymentType::Contract
    }
}

impl core::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EmploymentType::Permanent => write!(f, "Permanent"),
            EmploymentType::Contract => write!(f, "Contract"),
            EmploymentType::Temporary => write!(f, "Temporary"),
            EmploymentType::ThirdParty => write!(f, "Third Party"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetails {
    pub employment_type: Option<EmploymentType>,
    pub designation: String,
    pub contractor_name: String,
    pub third_party_company_name: String,
    pub gross_salary: Option<f64>,
}

/// Statutory identifiers. All optional; absent values persist as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceDetails {
    pub aadhaar: String,
    pub pan: String,
    pub driving_license: String,
    pub pf_number: String,
    pub uan: String,
    pub esi_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDetails {
    pub address_line: String,
    pub area: String,
    pub city: String,
    pub district: String,
    pub pincode: String,
    pub emergency_contact: String,
}

/// Access toggles carried alongside the account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationSettings {
    pub web_login: bool,
    pub mobile_app_access: bool,
    pub password_enabled: bool,
    pub otp_enabled: bool,
    pub force_otp_on_next_login: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a create/update call.
///
/// `role_id` is optional at the data-model level; when absent it is omitted
/// from the serialized payload entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub company_id: CompanyId,
    pub user_name: String,
    pub mobile_number: String,
    pub employee_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub profile: ProfileDetails,
    #[serde(default)]
    pub compliance: ComplianceDetails,
    #[serde(default)]
    pub address: AddressDetails,
    #[serde(default)]
    pub settings: ActivationSettings,
    #[serde(default)]
    pub status: AccountStatus,
}

/// Canonical user record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub id: UserId,
    #[serde(flatten)]
    pub details: UserDetails,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedUser {
    pub fn new(id: UserId, details: UserDetails) -> Self {
        Self {
            id,
            details,
            updated_at: None,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.details.user_name
    }

    pub fn status(&self) -> AccountStatus {
        self.details.status
    }
}

impl opsconsole_core::Entity for PersistedUser {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.details.user_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
