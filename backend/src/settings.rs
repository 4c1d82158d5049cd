//! Authentication settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `HEARTH_AUTH_*` environment variables, or a
//! configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::num::NonZeroU32;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::memory::LockoutConfig;

const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;
const DEFAULT_LOCKOUT_SECONDS: u64 = 900;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while validating [`AuthSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A lockout threshold was configured with a zero-length lock.
    #[error("lockout_seconds must be greater than zero when lockout is enabled")]
    ZeroLockoutPeriod,
    /// The lock duration does not fit a timestamp offset.
    #[error("lockout_seconds {0} is too large")]
    LockoutPeriodTooLong(u64),
    /// The bind address does not parse.
    #[error("invalid bind address '{value}'")]
    InvalidBindAddr { value: String },
}

/// Configuration controlling sign-in behaviour and bootstrap.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEARTH_AUTH")]
pub struct AuthSettings {
    /// Consecutive failures before a subject is locked; `0` disables lockout.
    pub max_failed_attempts: Option<u32>,
    /// Lock duration in seconds, also the window failures are counted in.
    pub lockout_seconds: Option<u64>,
    /// Seed demo accounts into the in-memory identity store on startup.
    #[ortho_config(default = false)]
    pub seed_demo: bool,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
}

impl AuthSettings {
    /// Configured failure threshold, falling back to the default.
    pub fn max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts
            .unwrap_or(DEFAULT_MAX_FAILED_ATTEMPTS)
    }

    /// Configured lock duration in seconds, falling back to the default.
    pub fn lockout_seconds(&self) -> u64 {
        self.lockout_seconds.unwrap_or(DEFAULT_LOCKOUT_SECONDS)
    }

    /// Validated lockout thresholds, or `None` when lockout is disabled.
    pub fn lockout_config(&self) -> Result<Option<LockoutConfig>, SettingsError> {
        let Some(max_failed_attempts) = NonZeroU32::new(self.max_failed_attempts()) else {
            return Ok(None);
        };
        let seconds = self.lockout_seconds();
        if seconds == 0 {
            return Err(SettingsError::ZeroLockoutPeriod);
        }
        let lockout = i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(SettingsError::LockoutPeriodTooLong(seconds))?;
        Ok(Some(LockoutConfig::new(max_failed_attempts, lockout)))
    }

    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for authentication settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "HEARTH_AUTH_MAX_FAILED_ATTEMPTS",
        "HEARTH_AUTH_LOCKOUT_SECONDS",
        "HEARTH_AUTH_SEED_DEMO",
        "HEARTH_AUTH_BIND_ADDR",
    ];

    fn load_from_empty_args() -> AuthSettings {
        AuthSettings::load_from_iter([OsString::from("hearth")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(!settings.seed_demo);
        assert_eq!(settings.max_failed_attempts(), 5);
        assert_eq!(settings.lockout_seconds(), 900);
        assert_eq!(
            settings.bind_addr(),
            Ok("0.0.0.0:8080".parse().expect("valid addr"))
        );
        let lockout = settings
            .lockout_config()
            .expect("valid")
            .expect("enabled");
        assert_eq!(lockout, LockoutConfig::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HEARTH_AUTH_MAX_FAILED_ATTEMPTS", Some("3".to_owned())),
            ("HEARTH_AUTH_LOCKOUT_SECONDS", Some("60".to_owned())),
            ("HEARTH_AUTH_SEED_DEMO", Some("true".to_owned())),
            ("HEARTH_AUTH_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.seed_demo);
        let lockout = settings
            .lockout_config()
            .expect("valid")
            .expect("enabled");
        assert_eq!(lockout.max_failed_attempts().get(), 3);
        assert_eq!(lockout.lockout(), Duration::seconds(60));
        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("valid addr"))
        );
    }

    #[rstest]
    fn zero_attempts_disables_lockout() {
        let _guard = lock_env([
            ("HEARTH_AUTH_MAX_FAILED_ATTEMPTS", Some("0".to_owned())),
            ("HEARTH_AUTH_LOCKOUT_SECONDS", None::<String>),
            ("HEARTH_AUTH_SEED_DEMO", None::<String>),
            ("HEARTH_AUTH_BIND_ADDR", None::<String>),
        ]);

        assert_eq!(load_from_empty_args().lockout_config(), Ok(None));
    }

    #[rstest]
    #[case(Some(0), Err(SettingsError::ZeroLockoutPeriod))]
    #[case(Some(u64::MAX), Err(SettingsError::LockoutPeriodTooLong(u64::MAX)))]
    fn invalid_lockout_periods_are_rejected(
        #[case] lockout_seconds: Option<u64>,
        #[case] expected: Result<Option<LockoutConfig>, SettingsError>,
    ) {
        let settings = AuthSettings {
            max_failed_attempts: Some(5),
            lockout_seconds,
            seed_demo: false,
            bind_addr: None,
        };
        assert_eq!(settings.lockout_config(), expected);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let settings = AuthSettings {
            max_failed_attempts: None,
            lockout_seconds: None,
            seed_demo: false,
            bind_addr: Some("not an address".to_owned()),
        };
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr {
                value: "not an address".to_owned()
            })
        );
    }
}
