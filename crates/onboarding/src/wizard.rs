//! The six-step onboarding wizard.
//!
//! The controller owns the draft for one session. Forward navigation is
//! gated by [`validate_step`]; saving is only possible from the summary
//! step and re-checks the first two steps in full before anything is sent.
//!
//! Saving is split in two so an event-driven caller can keep the save
//! button disabled while a request is outstanding:
//!
//! 1. [`WizardController::submit`] validates, resolves references and marks
//!    the wizard as saving;
//! 2. [`WizardController::complete`] records the backend's answer.
//!
//! [`WizardController::save`] runs both around a registry call.

use opsconsole_accounts::{AccountStatus, Company, PersistedUser, Role, TemporaryCredential, UserDetails};
use opsconsole_core::{CompanyId, Reference, UserId, find_unique_by_name};

use crate::activation::ActivationManager;
use crate::draft::UserDraft;
use crate::error::{EntityKind, OnboardingError, ResolutionWarning};
use crate::gateway::{GatewayError, UserRegistry};
use crate::resolver::{resolve_company_id, resolve_role_id};
use crate::step::WizardStep;
use crate::validator::validate_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit,
    /// Read-only; every step may be visited freely.
    View,
}

/// Where the draft came from, which decides create vs update on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOrigin {
    New,
    Existing { id: UserId, status: AccountStatus },
}

impl DraftOrigin {
    pub fn persisted_status(self) -> Option<AccountStatus> {
        match self {
            DraftOrigin::New => None,
            DraftOrigin::Existing { status, .. } => Some(status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(UserId),
}

/// A validated, resolved payload ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub details: UserDetails,
}

/// Result of [`WizardController::save_and_activate`].
#[derive(Debug)]
pub struct SaveOutcome {
    pub user: PersistedUser,
    /// Issued when the save moved the account to Active with password login.
    pub credential: Option<TemporaryCredential>,
}

#[derive(Debug, Clone)]
pub struct WizardController {
    mode: WizardMode,
    origin: DraftOrigin,
    step: WizardStep,
    draft: UserDraft,
    missing: Vec<&'static str>,
    notices: Vec<ResolutionWarning>,
    last_error: Option<OnboardingError>,
    saving: bool,
}

impl WizardController {
    fn with(mode: WizardMode, origin: DraftOrigin, draft: UserDraft) -> Self {
        Self {
            mode,
            origin,
            step: WizardStep::Identity,
            draft,
            missing: Vec::new(),
            notices: Vec::new(),
            last_error: None,
            saving: false,
        }
    }

    pub fn new_user() -> Self {
        Self::with(WizardMode::Create, DraftOrigin::New, UserDraft::new())
    }

    pub fn edit(user: &PersistedUser) -> Self {
        Self::with(
            WizardMode::Edit,
            DraftOrigin::Existing {
                id: user.id,
                status: user.details.status,
            },
            UserDraft::from_persisted(user),
        )
    }

    pub fn view(user: &PersistedUser) -> Self {
        Self::with(
            WizardMode::View,
            DraftOrigin::Existing {
                id: user.id,
                status: user.details.status,
            },
            UserDraft::from_persisted(user),
        )
    }

    // ── State exposed to the UI ──────────────────────────────────────────────

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn origin(&self) -> DraftOrigin {
        self.origin
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    /// Editable draft. Refused in view mode.
    pub fn draft_mut(&mut self) -> Result<&mut UserDraft, OnboardingError> {
        if self.mode == WizardMode::View {
            return Err(OnboardingError::ReadOnly);
        }
        Ok(&mut self.draft)
    }

    /// Labels reported by the most recent failed gate, in form order.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn notices(&self) -> &[ResolutionWarning] {
        &self.notices
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    pub fn last_error(&self) -> Option<&OnboardingError> {
        self.last_error.as_ref()
    }

    /// While true the save action must stay disabled.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    /// Advance one step if the current step's gate passes. On failure the
    /// wizard stays put and [`missing`](Self::missing) lists what to fill in.
    pub fn next(&mut self) -> Result<WizardStep, OnboardingError> {
        if self.mode != WizardMode::View {
            let validation = validate_step(self.step, &self.draft);
            self.missing = validation.labels();
            validation.into_result()?;
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
            self.missing.clear();
        }
        self.step
    }

    /// Jump directly to `target`. Forward jumps are only allowed in view
    /// mode; editing modes must pass each gate through [`next`](Self::next).
    pub fn go_to_step(&mut self, target: WizardStep) -> Result<WizardStep, OnboardingError> {
        if self.mode != WizardMode::View && target > self.step {
            return Err(OnboardingError::ForwardJump(target));
        }
        self.step = target;
        self.missing.clear();
        Ok(self.step)
    }

    /// Active roles selectable for the draft's current company.
    pub fn role_options<'a>(&self, companies: &[Company], roles: &'a [Role]) -> Vec<&'a Role> {
        let company_id: Option<CompanyId> = match self.draft.identity.company_ref() {
            Some(Reference::ById(id)) => Some(*id),
            Some(Reference::ByName(name)) => find_unique_by_name(companies, name).map(|c| c.id),
            None => None,
        };
        let Some(company_id) = company_id else {
            return Vec::new();
        };
        roles
            .iter()
            .filter(|r| r.belongs_to(company_id) && r.status.is_active())
            .collect()
    }

    // ── Saving ───────────────────────────────────────────────────────────────

    fn fail<T>(&mut self, err: OnboardingError) -> Result<T, OnboardingError> {
        self.last_error = Some(err.clone());
        Err(err)
    }

    /// Validate and resolve the draft into a request, and mark the wizard as
    /// saving. The caller must hand the backend's answer to
    /// [`complete`](Self::complete).
    pub fn submit(&mut self, companies: &[Company], roles: &[Role]) -> Result<SaveRequest, OnboardingError> {
        if self.mode == WizardMode::View {
            return Err(OnboardingError::ReadOnly);
        }
        if self.saving {
            return Err(OnboardingError::SaveInProgress);
        }
        if self.step != WizardStep::Summary {
            return self.fail(OnboardingError::NotOnSummary);
        }

        let validation = validate_step(WizardStep::Summary, &self.draft);
        self.missing = validation.labels();
        if let Err(err) = validation.into_result() {
            return self.fail(err);
        }

        let Some(company_ref) = self.draft.identity.company_ref().cloned() else {
            return self.fail(OnboardingError::unresolved(EntityKind::Company, "<none>"));
        };
        let company_id = match resolve_company_id(&company_ref, companies) {
            Ok(id) => id,
            Err(err) => return self.fail(err),
        };

        let role_id = match self.draft.identity.role_ref() {
            Some(role_ref) => {
                let resolved = resolve_role_id(role_ref, roles, company_id);
                if resolved.is_none() {
                    self.notices.push(ResolutionWarning::new(
                        EntityKind::Role,
                        format!("role {role_ref} not found for this company; saved without a role"),
                    ));
                }
                resolved
            }
            None => None,
        };

        if let Some(persisted) = self.origin.persisted_status() {
            if let Err(err) = persisted.transition(self.draft.activation.status) {
                return self.fail(err.into());
            }
        }

        let target = match self.origin {
            DraftOrigin::New => SaveTarget::Create,
            DraftOrigin::Existing { id, .. } => SaveTarget::Update(id),
        };
        self.saving = true;
        self.last_error = None;
        Ok(SaveRequest {
            target,
            details: self.draft.to_details(company_id, role_id),
        })
    }

    /// Record the backend's answer to a submitted request.
    ///
    /// On success the draft becomes an existing record, so a later save
    /// updates instead of creating a duplicate. On failure the wizard stays
    /// on the summary step with the draft untouched.
    pub fn complete(
        &mut self,
        result: Result<PersistedUser, GatewayError>,
    ) -> Result<PersistedUser, OnboardingError> {
        self.saving = false;
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, status = %user.details.status, "user saved");
                self.origin = DraftOrigin::Existing {
                    id: user.id,
                    status: user.details.status,
                };
                if self.mode == WizardMode::Create {
                    self.mode = WizardMode::Edit;
                }
                self.missing.clear();
                self.last_error = None;
                Ok(user)
            }
            Err(err) => {
                tracing::warn!("save rejected: {err}");
                self.fail(err.into())
            }
        }
    }

    /// Submit, call `create` or `update_complete`, and complete.
    pub async fn save<R>(
        &mut self,
        companies: &[Company],
        roles: &[Role],
        registry: &R,
    ) -> Result<PersistedUser, OnboardingError>
    where
        R: UserRegistry + ?Sized,
    {
        let request = self.submit(companies, roles)?;
        let result = match request.target {
            SaveTarget::Create => registry.create(request.details).await,
            SaveTarget::Update(id) => registry.update_complete(id, request.details).await,
        };
        self.complete(result)
    }

    /// Save, then activate when the save made the account Active with
    /// password login enabled.
    ///
    /// If activation fails after a successful save, the record stays saved
    /// (a retry updates it) and the activation error is returned.
    pub async fn save_and_activate<R>(
        &mut self,
        companies: &[Company],
        roles: &[Role],
        manager: &ActivationManager<R>,
    ) -> Result<SaveOutcome, OnboardingError>
    where
        R: UserRegistry,
    {
        let previous = self.origin.persisted_status();
        let user = self.save(companies, roles, manager.registry()).await?;

        let settings = user.details.settings;
        let became_active = user.details.status == AccountStatus::Active
            && previous != Some(AccountStatus::Active);
        if !(became_active && settings.password_enabled) {
            return Ok(SaveOutcome {
                user,
                credential: None,
            });
        }

        match manager.activate(user.id, settings).await {
            Ok(outcome) => Ok(SaveOutcome {
                user,
                credential: outcome.credential,
            }),
            Err(err) => self.fail(err),
        }
    }

    /// Discard the draft.
    pub fn cancel(self) {
        tracing::debug!(mode = ?self.mode, step = %self.step, "wizard cancelled; draft discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsconsole_accounts::EmploymentType;
    use opsconsole_core::RoleId;
    use proptest::prelude::*;

    fn filled(wizard: &mut WizardController, company: CompanyId) {
        let draft = wizard.draft_mut().unwrap();
        draft.set_company(Some(Reference::ById(company)));
        draft.set_role(Some(Reference::by_name("Driver")));
        draft.identity.user_name = "ravi.k".to_string();
        draft.identity.mobile_number = "9876543210".to_string();
        draft.identity.employee_code = "EMP-7".to_string();
        draft.profile.employment_type = Some(EmploymentType::Permanent);
        draft.profile.designation = "Driver".to_string();
    }

    fn walk_to_summary(wizard: &mut WizardController) {
        while wizard.step() != WizardStep::Summary {
            wizard.next().unwrap();
        }
    }

    #[test]
    fn blocked_gate_reports_missing_labels() {
        let mut wizard = WizardController::new_user();
        let err = wizard.next().unwrap_err();
        assert_eq!(err.missing_fields(), wizard.missing());
        assert_eq!(wizard.step(), WizardStep::Identity);
        assert_eq!(wizard.missing().first(), Some(&"Company"));
    }

    #[test]
    fn forward_jumps_only_in_view_mode() {
        let mut wizard = WizardController::new_user();
        assert_eq!(
            wizard.go_to_step(WizardStep::Address),
            Err(OnboardingError::ForwardJump(WizardStep::Address))
        );

        let company = CompanyId::new();
        filled(&mut wizard, company);
        walk_to_summary(&mut wizard);
        assert_eq!(wizard.go_to_step(WizardStep::Profile), Ok(WizardStep::Profile));
        assert_eq!(wizard.back(), WizardStep::Identity);
        assert_eq!(wizard.back(), WizardStep::Identity);
    }

    #[test]
    fn view_mode_is_read_only_and_free_to_navigate() {
        let mut editing = WizardController::new_user();
        filled(&mut editing, CompanyId::new());
        let details = editing.draft().to_details(CompanyId::new(), None);
        let user = PersistedUser::new(UserId::new(), details);

        let mut wizard = WizardController::view(&user);
        assert_eq!(wizard.go_to_step(WizardStep::Summary), Ok(WizardStep::Summary));
        assert_eq!(wizard.draft_mut().err(), Some(OnboardingError::ReadOnly));
        assert_eq!(wizard.submit(&[], &[]).unwrap_err(), OnboardingError::ReadOnly);
    }

    #[test]
    fn submit_only_from_summary_and_only_once() {
        let company = Company::new(CompanyId::new(), "ACM", "Acme");
        let roles = vec![Role::new(RoleId::new(), company.id, "Driver")];
        let mut wizard = WizardController::new_user();
        filled(&mut wizard, company.id);

        assert_eq!(
            wizard.submit(std::slice::from_ref(&company), &roles).unwrap_err(),
            OnboardingError::NotOnSummary
        );

        walk_to_summary(&mut wizard);
        let request = wizard.submit(std::slice::from_ref(&company), &roles).unwrap();
        assert_eq!(request.target, SaveTarget::Create);
        assert_eq!(request.details.role_id, Some(roles[0].id));
        assert!(wizard.is_saving());
        assert_eq!(
            wizard.submit(std::slice::from_ref(&company), &roles).unwrap_err(),
            OnboardingError::SaveInProgress
        );
    }

    #[test]
    fn failed_save_keeps_summary_and_draft() {
        let company = Company::new(CompanyId::new(), "ACM", "Acme");
        let mut wizard = WizardController::new_user();
        filled(&mut wizard, company.id);
        walk_to_summary(&mut wizard);
        let before = wizard.draft().clone();

        wizard.submit(std::slice::from_ref(&company), &[]).unwrap();
        let err = wizard
            .complete(Err(GatewayError::rejected(409, "user name already exists")))
            .unwrap_err();

        assert!(err.to_string().contains("user name already exists"));
        assert_eq!(wizard.step(), WizardStep::Summary);
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.last_error(), Some(&err));
        assert!(!wizard.is_saving());
        assert_eq!(wizard.origin(), DraftOrigin::New);
    }

    #[test]
    fn saved_account_cannot_return_to_draft() {
        let company = Company::new(CompanyId::new(), "ACM", "Acme");
        let mut wizard = WizardController::new_user();
        filled(&mut wizard, company.id);
        wizard.draft_mut().unwrap().activation.status = AccountStatus::Active;
        let user = PersistedUser::new(
            UserId::new(),
            wizard.draft().to_details(company.id, Some(RoleId::new())),
        );

        let mut wizard = WizardController::edit(&user);
        wizard.draft_mut().unwrap().activation.status = AccountStatus::Draft;
        walk_to_summary(&mut wizard);
        let err = wizard.submit(std::slice::from_ref(&company), &[]).unwrap_err();
        assert!(matches!(err, OnboardingError::Domain(_)));
        assert!(!wizard.is_saving());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: `next` from the first step advances exactly when the
        /// step 1 gate reports nothing missing.
        #[test]
        fn next_advances_iff_gate_passes(
            has_company in any::<bool>(),
            has_role in any::<bool>(),
            user_name in prop_oneof![Just(String::new()), Just(" ".to_string()), "[a-z]{1,6}"],
            mobile in prop_oneof![Just(String::new()), "[0-9]{10}"],
            code in prop_oneof![Just(String::new()), "[A-Z0-9]{3,6}"],
        ) {
            let mut wizard = WizardController::new_user();
            {
                let draft = wizard.draft_mut().unwrap();
                if has_company {
                    draft.set_company(Some(Reference::ById(CompanyId::new())));
                }
                if has_role {
                    draft.set_role(Some(Reference::ById(RoleId::new())));
                }
                draft.identity.user_name = user_name;
                draft.identity.mobile_number = mobile;
                draft.identity.employee_code = code;
            }
            let valid = validate_step(WizardStep::Identity, wizard.draft()).is_valid();
            let advanced = wizard.next().is_ok();
            prop_assert_eq!(advanced, valid);
            let expected = if valid { WizardStep::Profile } else { WizardStep::Identity };
            prop_assert_eq!(wizard.step(), expected);
        }
    }
}
