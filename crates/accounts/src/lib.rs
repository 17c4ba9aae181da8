//! `opsconsole-accounts`: company, role and user account models.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod company;
pub mod credential;
pub mod roles;
pub mod session;
pub mod user;

pub use company::{Company, RecordStatus};
pub use credential::{CredentialReceipt, OneTimeSecret, TemporaryCredential};
pub use roles::{Role, scoped_to};
pub use session::{CompanyProjection, ProfileProjection, Session};
pub use user::{
    AccountStatus, ActivationSettings, AddressDetails, ComplianceDetails, EmploymentType,
    PersistedUser, ProfileDetails, UserDetails,
};
