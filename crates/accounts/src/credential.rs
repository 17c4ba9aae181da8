//! One-time temporary credentials.
//!
//! A [`TemporaryCredential`] is only ever produced as the return value of an
//! activation or password reset. Its secret can be taken exactly once; after
//! that the credential only carries non-secret metadata. The type is neither
//! `Clone` nor `Serialize`, and the secret is held as a [`SecretString`] so it
//! is redacted in `Debug` output and zeroized on drop.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use opsconsole_core::UserId;

/// Secret that can be taken exactly once.
#[derive(Debug)]
pub struct OneTimeSecret(Option<SecretString>);

impl OneTimeSecret {
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self(Some(secret.into()))
    }

    /// Move the secret out. Every later call returns `None`.
    pub fn take(&mut self) -> Option<SecretString> {
        self.0.take()
    }

    pub fn is_consumed(&self) -> bool {
        self.0.is_none()
    }
}

impl<'de> Deserialize<'de> for OneTimeSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(OneTimeSecret::new)
    }
}

/// Temporary credential issued by activation or password reset.
#[derive(Debug, Deserialize)]
pub struct TemporaryCredential {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(rename = "temporary_password")]
    secret: OneTimeSecret,
    pub expires_at: DateTime<Utc>,
    #[serde(default = "default_force_change")]
    pub force_password_change: bool,
}

fn default_force_change() -> bool {
    true
}

impl TemporaryCredential {
    pub fn new(
        user_id: UserId,
        user_name: impl Into<String>,
        secret: impl Into<SecretString>,
        expires_at: DateTime<Utc>,
        force_password_change: bool,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            secret: OneTimeSecret::new(secret),
            expires_at,
            force_password_change,
        }
    }

    /// Take the secret for its single display.
    pub fn take_secret(&mut self) -> Option<SecretString> {
        self.secret.take()
    }

    pub fn is_revealed(&self) -> bool {
        self.secret.is_consumed()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Non-secret summary, safe to log and to keep after display.
    pub fn receipt(&self) -> CredentialReceipt {
        CredentialReceipt {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            expires_at: self.expires_at,
            force_password_change: self.force_password_change,
        }
    }
}

/// What remains known about an issued credential once its secret is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialReceipt {
    pub user_id: UserId,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
    pub force_password_change: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use secrecy::ExposeSecret;

    fn credential() -> TemporaryCredential {
        TemporaryCredential::new(UserId::new(), "ravi.k", "Tmp-9xQ2", Utc::now() + Duration::hours(24), true)
    }

    #[test]
    fn secret_is_taken_once() {
        let mut cred = credential();
        let secret = cred.take_secret().unwrap();
        assert_eq!(secret.expose_secret(), "Tmp-9xQ2");
        assert!(cred.is_revealed());
        assert!(cred.take_secret().is_none());
    }

    #[test]
    fn debug_output_is_redacted() {
        let mut cred = credential();
        let before = format!("{cred:?}");
        assert!(!before.contains("Tmp-9xQ2"));
        assert!(before.contains("REDACTED"));

        let secret = cred.take_secret().unwrap();
        assert!(!format!("{secret:?}").contains("Tmp-9xQ2"));
        assert!(format!("{cred:?}").contains("OneTimeSecret(None)"));
    }

    #[test]
    fn expiry_is_inclusive() {
        let cred = credential();
        assert!(!cred.is_expired(cred.expires_at - Duration::seconds(1)));
        assert!(cred.is_expired(cred.expires_at));
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = serde_json::json!({
            "user_id": UserId::new(),
            "user_name": "meena.s",
            "temporary_password": "Abc12345",
            "expires_at": "2026-10-17T10:00:00Z",
        });
        let mut cred: TemporaryCredential = serde_json::from_value(json).unwrap();
        assert!(cred.force_password_change);
        assert_eq!(cred.take_secret().unwrap().expose_secret(), "Abc12345");
    }
}
