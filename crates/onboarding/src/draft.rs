//! The wizard's working copy of a user record.

use opsconsole_accounts::{
    AccountStatus, ActivationSettings, AddressDetails, ComplianceDetails, PersistedUser,
    ProfileDetails, UserDetails,
};
use opsconsole_core::{CompanyId, CompanyRef, Reference, RoleId, RoleRef};

/// Fields that a step gate can report as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Company,
    UserName,
    MobileNumber,
    EmployeeCode,
    Role,
    EmploymentType,
    Designation,
    ContractorName,
}

impl RequiredField {
    /// Label shown to the operator.
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Company => "Company",
            RequiredField::UserName => "User Name",
            RequiredField::MobileNumber => "Mobile Number",
            RequiredField::EmployeeCode => "Employee Code",
            RequiredField::Role => "Role",
            RequiredField::EmploymentType => "Employment Type",
            RequiredField::Designation => "Designation",
            RequiredField::ContractorName => "Contractor Name",
        }
    }
}

/// Identity group.
///
/// Company and role are only reachable through accessors: a role is only
/// meaningful for the company it was chosen under, so every company
/// assignment clears the role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityFields {
    company_ref: Option<CompanyRef>,
    pub user_name: String,
    pub mobile_number: String,
    pub employee_code: String,
    role_ref: Option<RoleRef>,
    pub email_address: String,
}

impl IdentityFields {
    pub fn company_ref(&self) -> Option<&CompanyRef> {
        self.company_ref.as_ref()
    }

    pub fn role_ref(&self) -> Option<&RoleRef> {
        self.role_ref.as_ref()
    }

    /// Assign the company. Always clears the role.
    pub fn set_company(&mut self, company: Option<CompanyRef>) {
        self.company_ref = company;
        self.role_ref = None;
    }

    pub fn set_role(&mut self, role: Option<RoleRef>) {
        self.role_ref = role;
    }
}

/// Activation group: access toggles and the requested account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationFields {
    pub settings: ActivationSettings,
    pub status: AccountStatus,
}

/// In-progress user record, owned by the wizard for one session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserDraft {
    pub identity: IdentityFields,
    pub profile: ProfileDetails,
    pub compliance: ComplianceDetails,
    pub address: AddressDetails,
    pub activation: ActivationFields,
}

impl UserDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from a fetched record. Company and role arrive as
    /// canonical ids and stay tagged as such.
    pub fn from_persisted(user: &PersistedUser) -> Self {
        let d = &user.details;
        Self {
            identity: IdentityFields {
                company_ref: Some(Reference::ById(d.company_id)),
                user_name: d.user_name.clone(),
                mobile_number: d.mobile_number.clone(),
                employee_code: d.employee_code.clone(),
                role_ref: d.role_id.map(Reference::ById),
                email_address: d.email_address.clone(),
            },
            profile: d.profile.clone(),
            compliance: d.compliance.clone(),
            address: d.address.clone(),
            activation: ActivationFields {
                settings: d.settings,
                status: d.status,
            },
        }
    }

    pub fn set_company(&mut self, company: Option<CompanyRef>) {
        self.identity.set_company(company);
    }

    pub fn set_role(&mut self, role: Option<RoleRef>) {
        self.identity.set_role(role);
    }

    /// Build the create/update body from already-resolved ids.
    ///
    /// Text fields are trimmed; the contractor name is dropped unless the
    /// employment type calls for one.
    pub(crate) fn to_details(&self, company_id: CompanyId, role_id: Option<RoleId>) -> UserDetails {
        let mut profile = self.profile.clone();
        profile.designation = profile.designation.trim().to_string();
        profile.contractor_name = match profile.employment_type {
            Some(t) if t.requires_contractor() => profile.contractor_name.trim().to_string(),
            _ => String::new(),
        };
        profile.third_party_company_name = profile.third_party_company_name.trim().to_string();

        UserDetails {
            company_id,
            user_name: self.identity.user_name.trim().to_string(),
            mobile_number: self.identity.mobile_number.trim().to_string(),
            employee_code: self.identity.employee_code.trim().to_string(),
            role_id,
            email_address: self.identity.email_address.trim().to_string(),
            profile,
            compliance: self.compliance.clone(),
            address: self.address.clone(),
            settings: self.activation.settings,
            status: self.activation.status,
        }
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
