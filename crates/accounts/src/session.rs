use serde::{Deserialize, Serialize};

use opsconsole_core::{CompanyId, UserId};

use crate::Company;

/// The signed-in operator, as established by the surrounding console.
///
/// This is passed explicitly into the components that need it; nothing in
/// this workspace reads an ambient authentication context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Canonical id of the operator, when the login response carried one.
    pub principal_id: Option<UserId>,
    pub user_name: String,
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub company_code: String,
    #[serde(default)]
    pub company_name: String,
}

impl Session {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            principal_id: None,
            user_name: user_name.into(),
            company_id: None,
            company_code: String::new(),
            company_name: String::new(),
        }
    }

    pub fn with_principal(mut self, principal_id: UserId) -> Self {
        self.principal_id = Some(principal_id);
        self
    }

    pub fn with_company(mut self, company: &Company) -> Self {
        self.company_id = Some(company.id);
        self.company_code = company.code.clone();
        self.company_name = company.name.clone();
        self
    }

    /// Minimal company view built from session data alone.
    pub fn company_projection(&self) -> CompanyProjection {
        CompanyProjection {
            id: self.company_id,
            code: self.company_code.clone(),
            name: self.company_name.clone(),
        }
    }

    /// Minimal profile view built from session data alone.
    pub fn profile_projection(&self) -> ProfileProjection {
        ProfileProjection {
            id: self.principal_id,
            user_name: self.user_name.clone(),
            company_name: self.company_name.clone(),
        }
    }
}

/// Company as shown on read paths; `id` is absent when it could not be
/// resolved canonically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProjection {
    pub id: Option<CompanyId>,
    pub code: String,
    pub name: String,
}

impl From<&Company> for CompanyProjection {
    fn from(company: &Company) -> Self {
        Self {
            id: Some(company.id),
            code: company.code.clone(),
            name: company.name.clone(),
        }
    }
}

/// Operator profile as shown on read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileProjection {
    pub id: Option<UserId>,
    pub user_name: String,
    pub company_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projections_come_from_session_only() {
        let company = Company::new(CompanyId::new(), "ACM", "Acme Logistics");
        let principal = UserId::new();
        let session = Session::new("admin").with_principal(principal).with_company(&company);

        assert_eq!(session.company_projection(), CompanyProjection::from(&company));
        let profile = session.profile_projection();
        assert_eq!(profile.id, Some(principal));
        assert_eq!(profile.company_name, "Acme Logistics");
    }
}
