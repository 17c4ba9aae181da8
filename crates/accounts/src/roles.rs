use serde::{Deserialize, Serialize};

use opsconsole_core::{CompanyId, Entity, RoleId};

use crate::RecordStatus;

/// Role master record.
///
/// A role belongs to exactly one company; role names are only unique within
/// that company, so any name lookup must be scoped first (see [`scoped_to`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub company_id: CompanyId,
    #[serde(default)]
    pub status: RecordStatus,
}

impl Role {
    pub fn new(id: RoleId, company_id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            company_id,
            status: RecordStatus::Active,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn belongs_to(&self, company_id: CompanyId) -> bool {
        self.company_id == company_id
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> RoleId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Roles owned by `company_id`, in their original order.
pub fn scoped_to(roles: &[Role], company_id: CompanyId) -> Vec<&Role> {
    roles.iter().filter(|r| r.belongs_to(company_id)).collect()
}
