//! Workflow error taxonomy.

use thiserror::Error;

use opsconsole_core::DomainError;

use crate::gateway::GatewayError;
use crate::step::WizardStep;

/// Kind of record a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Role,
    User,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntityKind::Company => write!(f, "company"),
            EntityKind::Role => write!(f, "role"),
            EntityKind::User => write!(f, "user"),
        }
    }
}

/// Onboarding workflow error.
///
/// None of these discard the draft; every variant leaves the wizard where it
/// was so the operator can correct and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    /// Required fields are missing for a step (or for the summary re-check).
    #[error("step {step} is incomplete, missing: {}", .missing.join(", "))]
    Validation {
        step: WizardStep,
        missing: Vec<&'static str>,
    },

    /// The backend rejected a create/update/activate/reset call.
    #[error(transparent)]
    Persistence(#[from] GatewayError),

    /// A write path needed a canonical id that could not be resolved.
    #[error("{entity} reference '{reference}' could not be resolved to a canonical id")]
    UnresolvedIdentity { entity: EntityKind, reference: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("a save for this draft is already in progress")]
    SaveInProgress,

    #[error("save is only available from the summary step")]
    NotOnSummary,

    #[error("the wizard is open read-only")]
    ReadOnly,

    #[error("cannot jump forward to step {0}; use next")]
    ForwardJump(WizardStep),
}

impl OnboardingError {
    pub fn unresolved(entity: EntityKind, reference: impl core::fmt::Display) -> Self {
        Self::UnresolvedIdentity {
            entity,
            reference: reference.to_string(),
        }
    }

    /// Missing-field labels, when this is a validation failure.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            OnboardingError::Validation { missing, .. } => missing,
            _ => &[],
        }
    }
}

/// Non-fatal notice raised when a read-path lookup degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionWarning {
    pub entity: EntityKind,
    pub message: String,
}

impl ResolutionWarning {
    pub fn new(entity: EntityKind, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}
