//! Onboarding configuration.
//!
//! Read from environment variables; anything missing or malformed falls back
//! to the default with a warning.

use anyhow::{Context, bail};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const ENV_ROLE_FALLBACK: &str = "OPSCONSOLE_ROLE_FALLBACK";
pub const ENV_CREDENTIAL_TTL_HOURS: &str = "OPSCONSOLE_CREDENTIAL_TTL_HOURS";
pub const ENV_TEMP_SECRET_LEN: &str = "OPSCONSOLE_TEMP_SECRET_LEN";

pub(crate) const MIN_SECRET_LEN: usize = 8;
/// One year.
pub const MAX_CREDENTIAL_TTL_HOURS: u32 = 8760;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Shown in place of a role reference that no loaded role matches.
    pub role_fallback_label: String,
    /// Lifetime of issued temporary credentials.
    pub credential_ttl_hours: u32,
    /// Length of generated temporary secrets.
    pub temp_secret_len: usize,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            role_fallback_label: "-".to_string(),
            credential_ttl_hours: 24,
            temp_secret_len: 12,
        }
    }
}

impl OnboardingConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        match Self::from_lookup(|key| std::env::var(key).ok()) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("invalid onboarding configuration, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Load from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(label) = lookup(ENV_ROLE_FALLBACK) {
            cfg.role_fallback_label = label;
        }

        if let Some(raw) = lookup(ENV_CREDENTIAL_TTL_HOURS) {
            cfg.credential_ttl_hours = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CREDENTIAL_TTL_HOURS}={raw:?} is not a number of hours"))?;
            if cfg.credential_ttl_hours == 0 {
                bail!("{ENV_CREDENTIAL_TTL_HOURS} must be at least 1");
            }
            if cfg.credential_ttl_hours > MAX_CREDENTIAL_TTL_HOURS {
                bail!("{ENV_CREDENTIAL_TTL_HOURS} must be at most {MAX_CREDENTIAL_TTL_HOURS}");
            }
        }

        if let Some(raw) = lookup(ENV_TEMP_SECRET_LEN) {
            cfg.temp_secret_len = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TEMP_SECRET_LEN}={raw:?} is not a length"))?;
            if cfg.temp_secret_len < MIN_SECRET_LEN {
                bail!("{ENV_TEMP_SECRET_LEN} must be at least {MIN_SECRET_LEN}");
            }
        }

        Ok(cfg)
    }

    pub fn credential_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.credential_ttl_hours))
    }
}
