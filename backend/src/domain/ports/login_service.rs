//! Driving port for sign-in use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing identity store, lockout collaborator, or device bindings.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{AuthErrorCode, AuthResult, Credential, Error, RawCredential};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve a validated credential to an [`AuthResult`].
    ///
    /// Failures a caller may see are returned as `Ok(AuthResult::Failure)`;
    /// `Err` is reserved for unexpected defects.
    async fn authenticate(&self, credential: &Credential) -> Result<AuthResult, Error>;

    /// Validate a raw payload, then authenticate it.
    ///
    /// Malformed payloads yield `InvalidFormat` without reaching any
    /// collaborator.
    async fn authenticate_raw(&self, raw: RawCredential) -> Result<AuthResult, Error> {
        match Credential::try_from(raw) {
            Ok(credential) => self.authenticate(&credential).await,
            Err(err) => {
                debug!(reason = %err, "credential rejected before lookup");
                Ok(AuthResult::fail_with_default_message(
                    AuthErrorCode::InvalidFormat,
                ))
            }
        }
    }
}
