//! Port for the failed-attempt lockout collaborator.
//!
//! The core asks for admission before verifying a secret and then settles
//! the attempt. Admission and counting happen in one step, so concurrent
//! guesses cannot all slip past the threshold. Thresholds and windows belong
//! to the adapter.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{DeviceId, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lockout adapters.
    pub enum LockoutError {
        /// Lockout state could not be reached.
        Unavailable { message: String } => "lockout store unavailable: {message}",
        /// Lockout bookkeeping failed unexpectedly.
        Query { message: String } => "lockout query failed: {message}",
    }
}

/// What failed attempts are counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttemptSubject {
    /// Password attempts count against the submitted username, whether or not
    /// it exists.
    Username(UserName),
    /// PIN attempts count against the device.
    Device(DeviceId),
}

impl fmt::Display for AttemptSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(name) => write!(f, "user:{name}"),
            Self::Device(device) => write!(f, "device:{device}"),
        }
    }
}

/// Whether a sign-in attempt may proceed to verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptAdmission {
    /// The attempt is counted as a failure until it is settled.
    Admitted,
    /// The subject is locked out; nothing was counted.
    Locked,
}

/// Lockout collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockoutPolicy: Send + Sync {
    /// Refuse `subject` when locked, otherwise count the attempt as a failure
    /// in the same step.
    async fn begin_attempt(
        &self,
        subject: &AttemptSubject,
    ) -> Result<AttemptAdmission, LockoutError>;

    /// Clear failure history after a successful sign-in.
    async fn record_success(&self, subject: &AttemptSubject) -> Result<(), LockoutError>;

    /// Withdraw an admitted attempt that ended without a credential verdict,
    /// such as an identity store outage.
    async fn abandon_attempt(&self, subject: &AttemptSubject) -> Result<(), LockoutError>;
}

/// Lockout policy that never locks; used when lockout is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLockoutPolicy;

#[async_trait]
impl LockoutPolicy for NoLockoutPolicy {
    async fn begin_attempt(
        &self,
        _subject: &AttemptSubject,
    ) -> Result<AttemptAdmission, LockoutError> {
        Ok(AttemptAdmission::Admitted)
    }

    async fn record_success(&self, _subject: &AttemptSubject) -> Result<(), LockoutError> {
        Ok(())
    }

    async fn abandon_attempt(&self, _subject: &AttemptSubject) -> Result<(), LockoutError> {
        Ok(())
    }
}
