//! Step gates.
//!
//! `validate_step` is pure: it reads the draft and nothing else, so the same
//! draft always yields the same result.

use crate::draft::{RequiredField, UserDraft, is_blank};
use crate::error::OnboardingError;
use crate::step::WizardStep;

/// Outcome of checking one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValidation {
    pub step: WizardStep,
    /// Missing fields, in form order.
    pub missing: Vec<RequiredField>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(|f| f.label()).collect()
    }

    pub fn into_result(self) -> Result<(), OnboardingError> {
        if self.is_valid() {
            return Ok(());
        }
        Err(OnboardingError::Validation {
            step: self.step,
            missing: self.labels(),
        })
    }
}

/// Report the unmet requirements of `step` for `draft`.
///
/// | step | required |
/// |------|----------|
/// | 1 | company, user name, mobile number, employee code, role |
/// | 2 | employment type, designation, contractor name (contract staff only) |
/// | 3–5 | nothing |
/// | 6 | everything steps 1 and 2 require |
pub fn validate_step(step: WizardStep, draft: &UserDraft) -> StepValidation {
    let mut missing = Vec::new();
    match step {
        WizardStep::Identity => identity_missing(draft, &mut missing),
        WizardStep::Profile => profile_missing(draft, &mut missing),
        WizardStep::Compliance | WizardStep::Address | WizardStep::Activation => {}
        WizardStep::Summary => {
            identity_missing(draft, &mut missing);
            profile_missing(draft, &mut missing);
        }
    }
    StepValidation { step, missing }
}

fn identity_missing(draft: &UserDraft, missing: &mut Vec<RequiredField>) {
    let id = &draft.identity;
    if id.company_ref().is_none() {
        missing.push(RequiredField::Company);
    }
    if is_blank(&id.user_name) {
        missing.push(RequiredField::UserName);
    }
    if is_blank(&id.mobile_number) {
        missing.push(RequiredField::MobileNumber);
    }
    if is_blank(&id.employee_code) {
        missing.push(RequiredField::EmployeeCode);
    }
    if id.role_ref().is_none() {
        missing.push(RequiredField::Role);
    }
}

fn profile_missing(draft: &UserDraft, missing: &mut Vec<RequiredField>) {
    let profile = &draft.profile;
    if profile.employment_type.is_none() {
        missing.push(RequiredField::EmploymentType);
    }
    if is_blank(&profile.designation) {
        missing.push(RequiredField::Designation);
    }
    if profile.employment_type.is_some_and(|t| t.requires_contractor())
        && is_blank(&profile.contractor_name)
    {
        missing.push(RequiredField::ContractorName);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsconsole_accounts::EmploymentType;
    use opsconsole_core::{CompanyId, Reference, RoleId};
    use proptest::prelude::*;

    fn identity_complete() -> UserDraft {
        let mut draft = UserDraft::new();
        draft.set_company(Some(Reference::by_id(CompanyId::new())));
        draft.set_role(Some(Reference::by_name("Driver")));
        draft.identity.user_name = "ravi.k".to_string();
        draft.identity.mobile_number = "9876543210".to_string();
        draft.identity.employee_code = "EMP-001".to_string();
        draft
    }

    #[test]
    fn empty_draft_misses_every_identity_field_in_order() {
        let result = validate_step(WizardStep::Identity, &UserDraft::new());
        assert_eq!(
            result.labels(),
            vec!["Company", "User Name", "Mobile Number", "Employee Code", "Role"]
        );
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut draft = identity_complete();
        draft.identity.employee_code = "   ".to_string();
        assert_eq!(validate_step(WizardStep::Identity, &draft).labels(), vec!["Employee Code"]);
    }

    #[test]
    fn contract_staff_need_a_contractor() {
        let mut draft = identity_complete();
        draft.profile.employment_type = Some(EmploymentType::Contract);
        draft.profile.designation = "Loader".to_string();

        let result = validate_step(WizardStep::Profile, &draft);
        assert_eq!(result.labels(), vec!["Contractor Name"]);

        draft.profile.employment_type = Some(EmploymentType::Permanent);
        assert!(validate_step(WizardStep::Profile, &draft).is_valid());
    }

    #[test]
    fn middle_steps_have_no_requirements() {
        let draft = UserDraft::new();
        for step in [WizardStep::Compliance, WizardStep::Address, WizardStep::Activation] {
            assert!(validate_step(step, &draft).is_valid(), "{step} should pass");
        }
    }

    #[test]
    fn summary_rechecks_steps_one_and_two() {
        let mut draft = identity_complete();
        draft.profile.employment_type = Some(EmploymentType::Permanent);
        draft.profile.designation = "Dispatcher".to_string();
        assert!(validate_step(WizardStep::Summary, &draft).is_valid());

        draft.identity.mobile_number.clear();
        draft.profile.designation.clear();
        let err = validate_step(WizardStep::Summary, &draft).into_result().unwrap_err();
        assert_eq!(err.missing_fields(), &["Mobile Number", "Designation"]);
    }

    fn text() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z0-9]{1,8}"]
    }

    fn employment() -> impl Strategy<Value = Option<EmploymentType>> {
        prop_oneof![
            Just(None),
            Just(Some(EmploymentType::Permanent)),
            Just(Some(EmploymentType::Contract)),
            Just(Some(EmploymentType::ThirdParty)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: the summary gate reports exactly the union of the
        /// step 1 and step 2 gates, in that order.
        #[test]
        fn summary_is_union_of_first_two_steps(
            has_company in any::<bool>(),
            has_role in any::<bool>(),
            user_name in text(),
            mobile in text(),
            code in text(),
            employment_type in employment(),
            designation in text(),
            contractor in text(),
        ) {
            let mut draft = UserDraft::new();
            if has_company {
                draft.set_company(Some(Reference::by_id(CompanyId::new())));
            }
            if has_role {
                draft.set_role(Some(Reference::by_id(RoleId::new())));
            }
            draft.identity.user_name = user_name;
            draft.identity.mobile_number = mobile;
            draft.identity.employee_code = code;
            draft.profile.employment_type = employment_type;
            draft.profile.designation = designation;
            draft.profile.contractor_name = contractor.clone();

            let mut expected = validate_step(WizardStep::Identity, &draft).missing;
            expected.extend(validate_step(WizardStep::Profile, &draft).missing);

            prop_assert_eq!(validate_step(WizardStep::Summary, &draft).missing, expected);

            let needs_contractor = employment_type == Some(EmploymentType::Contract)
                && contractor.trim().is_empty();
            let reported = validate_step(WizardStep::Profile, &draft)
                .missing
                .contains(&RequiredField::ContractorName);
            prop_assert_eq!(reported, needs_contractor);
        }
    }
}
