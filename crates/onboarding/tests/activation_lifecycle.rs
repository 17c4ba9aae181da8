use std::sync::Arc;

use chrono::Utc;
use secrecy::ExposeSecret;

use opsconsole_accounts::{
    AccountStatus, ActivationSettings, Company, EmploymentType, Role, Session, UserDetails,
};
use opsconsole_core::{CompanyId, Reference, RoleId, UserId};
use opsconsole_onboarding::{
    ActivationManager, CredentialSlot, EntityKind, GatewayError, InMemoryUserRegistry,
    OnboardingConfig, OnboardingError, UserList, UserRegistry, WizardController, WizardStep,
};

fn password_login() -> ActivationSettings {
    ActivationSettings {
        web_login: true,
        password_enabled: true,
        ..Default::default()
    }
}

fn details(company_id: CompanyId, user_name: &str) -> UserDetails {
    UserDetails {
        company_id,
        user_name: user_name.to_string(),
        mobile_number: "9876543210".to_string(),
        employee_code: format!("EMP-{user_name}"),
        role_id: None,
        email_address: String::new(),
        profile: Default::default(),
        compliance: Default::default(),
        address: Default::default(),
        settings: Default::default(),
        status: AccountStatus::Draft,
    }
}

fn manager() -> ActivationManager<Arc<InMemoryUserRegistry>> {
    opsconsole_observability::init();
    let registry = Arc::new(InMemoryUserRegistry::new(OnboardingConfig::default()));
    ActivationManager::new(registry, Session::new("admin"))
}

#[tokio::test]
async fn reset_supersedes_the_activation_credential() {
    let manager = manager();
    let user = manager
        .registry()
        .create(details(CompanyId::new(), "ravi.k"))
        .await
        .unwrap();

    let mut first = manager
        .activate(user.id, password_login())
        .await
        .unwrap()
        .credential
        .expect("password login issues a credential");
    let s1 = first.take_secret().unwrap().expose_secret().to_string();
    let e1 = first.expires_at;
    assert!(manager.registry().verify_temporary_secret(user.id, &s1, Utc::now()));

    let mut second = manager.reset_password(user.id).await.unwrap();
    let s2 = second.take_secret().unwrap().expose_secret().to_string();
    let e2 = second.expires_at;

    assert_ne!(s1, s2);
    assert_ne!(e1, e2);
    assert!(e2 > e1);
    assert!(!manager.registry().verify_temporary_secret(user.id, &s1, Utc::now()));
    assert!(manager.registry().verify_temporary_secret(user.id, &s2, Utc::now()));
    assert!(!manager.registry().verify_temporary_secret(user.id, &s2, e2));
}

#[tokio::test]
async fn activation_without_password_issues_nothing() {
    let manager = manager();
    let user = manager
        .registry()
        .create(details(CompanyId::new(), "meena.s"))
        .await
        .unwrap();

    let settings = ActivationSettings {
        mobile_app_access: true,
        otp_enabled: true,
        ..Default::default()
    };
    let outcome = manager.activate(user.id, settings).await.unwrap();
    assert!(outcome.credential.is_none());
    assert_eq!(outcome.status, AccountStatus::Active);

    let stored = manager.registry().get_by_id(user.id).await.unwrap();
    assert_eq!(stored.details.settings, settings);
    assert_eq!(stored.details.status, AccountStatus::Active);
}

#[tokio::test]
async fn rejected_activation_applies_nothing() {
    let manager = manager();
    let user = manager
        .registry()
        .create(details(CompanyId::new(), "arun.p"))
        .await
        .unwrap();

    manager
        .registry()
        .reject_next(GatewayError::rejected(403, "activation not permitted"));
    let err = manager.activate(user.id, password_login()).await.unwrap_err();
    assert_eq!(err.to_string(), "activation not permitted (status 403)");

    let stored = manager.registry().get_by_id(user.id).await.unwrap();
    assert_eq!(stored.details.status, AccountStatus::Draft);
    assert_eq!(stored.details.settings, ActivationSettings::default());
}

#[tokio::test]
async fn list_actions_route_credentials_through_the_slot() {
    let manager = manager();
    let user = manager
        .registry()
        .create(details(CompanyId::new(), "kiran.d"))
        .await
        .unwrap();
    let mut list = UserList::from_users(std::slice::from_ref(&user), &[], "-");
    let mut slot = CredentialSlot::new();

    list.activate(&manager, user.id, password_login(), &mut slot).await.unwrap();
    assert_eq!(list.row(user.id).map(|r| r.status), Some(AccountStatus::Active));
    let s1 = slot.reveal().unwrap().into_secret().expose_secret().to_string();
    assert!(slot.reveal().is_none());
    slot.acknowledge();

    list.deactivate(&manager, user.id).await.unwrap();
    assert_eq!(list.row(user.id).map(|r| r.status), Some(AccountStatus::Inactive));
    assert!(manager.registry().verify_temporary_secret(user.id, &s1, Utc::now()));

    list.reset_password(&manager, user.id, &mut slot).await.unwrap();
    let s2 = slot.reveal().unwrap().into_secret().expose_secret().to_string();
    assert_ne!(s1, s2);
    assert!(!manager.registry().verify_temporary_secret(user.id, &s1, Utc::now()));

    list.delete(manager.registry(), user.id).await.unwrap();
    assert!(list.rows().is_empty());
    assert_eq!(
        manager.registry().get_by_id(user.id).await.unwrap_err(),
        GatewayError::NotFound
    );
}

#[tokio::test]
async fn own_password_reset_needs_a_canonical_identity() {
    let registry = Arc::new(InMemoryUserRegistry::default());
    let me = registry.create(details(CompanyId::new(), "admin")).await.unwrap();

    let manager = ActivationManager::new(registry.clone(), Session::new("admin").with_principal(me.id));
    let mut cred = manager.reset_own_password().await.unwrap();
    assert_eq!(cred.user_id, me.id);
    assert!(cred.take_secret().is_some());

    let stranger = ActivationManager::new(registry, Session::new("ghost").with_principal(UserId::new()));
    let err = stranger.reset_own_password().await.unwrap_err();
    assert!(matches!(err, OnboardingError::UnresolvedIdentity { entity: EntityKind::User, .. }));
}

#[tokio::test]
async fn saving_a_new_active_user_issues_one_credential() {
    let manager = manager();
    let company = Company::new(CompanyId::new(), "ACM", "Acme");
    let role = Role::new(RoleId::new(), company.id, "Driver");

    let mut wizard = WizardController::new_user();
    {
        let draft = wizard.draft_mut().unwrap();
        draft.set_company(Some(Reference::ById(company.id)));
        draft.set_role(Some(Reference::ById(role.id)));
        draft.identity.user_name = "new.hire".to_string();
        draft.identity.mobile_number = "9000000001".to_string();
        draft.identity.employee_code = "EMP-900".to_string();
        draft.profile.employment_type = Some(EmploymentType::Temporary);
        draft.profile.designation = "Picker".to_string();
        draft.activation.settings = password_login();
        draft.activation.status = AccountStatus::Active;
    }
    while wizard.step() != WizardStep::Summary {
        wizard.next().unwrap();
    }

    let companies = [company];
    let roles = [role];
    let mut outcome = wizard.save_and_activate(&companies, &roles, &manager).await.unwrap();
    let secret = outcome
        .credential
        .as_mut()
        .and_then(|c| c.take_secret())
        .expect("credential issued on activation");
    assert!(manager.registry().verify_temporary_secret(outcome.user.id, secret.expose_secret(), Utc::now()));

    // Saving again does not re-activate an already active account.
    let again = wizard.save_and_activate(&companies, &roles, &manager).await.unwrap();
    assert!(again.credential.is_none());
    assert!(manager.registry().verify_temporary_secret(outcome.user.id, secret.expose_secret(), Utc::now()));
}

#[tokio::test]
async fn reset_with_an_unrepresentable_lifetime_fails_cleanly() {
    let registry = Arc::new(InMemoryUserRegistry::new(OnboardingConfig {
        credential_ttl_hours: u32::MAX,
        ..OnboardingConfig::default()
    }));
    let manager = ActivationManager::new(registry, Session::new("admin"));
    let user = manager
        .registry()
        .create(details(CompanyId::new(), "late.hire"))
        .await
        .unwrap();

    let err = manager.reset_password(user.id).await.unwrap_err();
    assert_eq!(err.to_string(), "credential expiry out of range (status 500)");
}
