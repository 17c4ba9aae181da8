//! User onboarding workflow for the operations console.
//!
//! - [`WizardController`]: six-step create/edit/view wizard with step gates.
//! - [`validate_step`]: pure per-step required-field checks.
//! - [`IdentityResolver`] and the resolver functions: id/name resolution for
//!   companies and roles, with a reconciliation pass for late role data.
//! - [`ActivationManager`]: activation, deactivation and one-time temporary
//!   credentials.
//!
//! The backend is reached only through the traits in [`gateway`].

pub mod activation;
pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod in_memory;
pub mod list;
pub mod loader;
pub mod resolver;
pub mod step;
pub mod validator;
pub mod wizard;

pub use activation::{ActivationManager, ActivationOutcome, CredentialSlot, RevealedCredential};
pub use config::OnboardingConfig;
pub use draft::{ActivationFields, IdentityFields, RequiredField, UserDraft};
pub use error::{EntityKind, OnboardingError, ResolutionWarning};
pub use gateway::{CompanyDirectory, GatewayError, RoleDirectory, UserRegistry};
pub use in_memory::{InMemoryDirectory, InMemoryUserRegistry};
pub use list::UserList;
pub use loader::{Epoch, ReferenceLoader, RoleSnapshot};
pub use resolver::{
    CompanyResolution, DisplayedRow, IdentityResolver, ProfileResolution, RoleDisplay, reconcile,
    resolve_company_id, resolve_role_display, resolve_role_id,
};
pub use step::WizardStep;
pub use validator::{StepValidation, validate_step};
pub use wizard::{DraftOrigin, SaveOutcome, SaveRequest, SaveTarget, WizardController, WizardMode};
