//! Authentication domain service.
//!
//! [`Authenticator`] implements the [`LoginService`] driving port over the
//! identity store, lockout and device binding ports. Every rejection a
//! caller can observe collapses to one of the [`AuthErrorCode`] values; the
//! precise reason is only ever logged.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::ports::{
    AttemptAdmission, AttemptSubject, DeviceBindingStore, IdentityStore, IdentityStoreError, LockoutError,
    LockoutPolicy, LoginService, PrincipalResolver,
};
use super::{
    ApplicationUser, AuthErrorCode, AuthResult, ContextFailure, Credential, Error,
    PasswordCredential, PinCredential, UserId, UserSummary,
};

/// Why a sign-in was refused as `InvalidCredentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvalidReason {
    UnknownUser,
    UnknownDevice,
    WrongSecret,
    HouseholdMissing,
    HouseholdInactive,
}

impl InvalidReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::UnknownUser => "unknown_user",
            Self::UnknownDevice => "unknown_device",
            Self::WrongSecret => "wrong_secret",
            Self::HouseholdMissing => "household_missing",
            Self::HouseholdInactive => "household_inactive",
        }
    }
}

enum Rejection {
    Locked,
    Invalid(InvalidReason),
    Unavailable,
    Defect(Error),
}

impl From<IdentityStoreError> for Rejection {
    fn from(value: IdentityStoreError) -> Self {
        match value {
            IdentityStoreError::Unavailable { message } => {
                warn!(%message, "identity store unavailable during sign-in");
                Self::Unavailable
            }
            IdentityStoreError::Query { message } => {
                error!(%message, "identity store query failed during sign-in");
                Self::Defect(Error::internal("authentication failed unexpectedly"))
            }
        }
    }
}

impl From<LockoutError> for Rejection {
    fn from(value: LockoutError) -> Self {
        match value {
            LockoutError::Unavailable { message } => {
                warn!(%message, "lockout store unavailable during sign-in");
                Self::Unavailable
            }
            LockoutError::Query { message } => {
                error!(%message, "lockout query failed during sign-in");
                Self::Defect(Error::internal("authentication failed unexpectedly"))
            }
        }
    }
}

fn attempt_subject(credential: &Credential) -> AttemptSubject {
    match credential {
        Credential::Password(password) => AttemptSubject::Username(password.username().clone()),
        Credential::Pin(pin) => AttemptSubject::Device(pin.device_id().clone()),
    }
}

/// Credential verification over the identity store.
#[derive(Clone)]
pub struct Authenticator {
    identities: Arc<dyn IdentityStore>,
    lockout: Arc<dyn LockoutPolicy>,
    devices: Arc<dyn DeviceBindingStore>,
}

impl Authenticator {
    /// Build an authenticator from its collaborators.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        lockout: Arc<dyn LockoutPolicy>,
        devices: Arc<dyn DeviceBindingStore>,
    ) -> Self {
        Self {
            identities,
            lockout,
            devices,
        }
    }

    async fn attempt(
        &self,
        credential: &Credential,
        subject: &AttemptSubject,
    ) -> Result<ApplicationUser, Rejection> {
        if self.lockout.begin_attempt(subject).await? == AttemptAdmission::Locked {
            return Err(Rejection::Locked);
        }

        let user = match self.verify(credential).await {
            Ok(user) => user,
            Err(rejection) => {
                if !matches!(rejection, Rejection::Invalid(_)) {
                    self.abandon(subject).await;
                }
                return Err(rejection);
            }
        };

        if let Err(err) = self.lockout.record_success(subject).await {
            warn!(%subject, error = %err, "could not clear failed attempts");
        }
        if let Credential::Password(password) = credential {
            self.remember_device_if_requested(user.id(), password).await;
        }
        Ok(user)
    }

    async fn verify(&self, credential: &Credential) -> Result<ApplicationUser, Rejection> {
        let user = match credential {
            Credential::Password(password) => self.check_password(password).await?,
            Credential::Pin(pin) => self.check_pin(pin).await?,
        };
        self.ensure_household_active(&user).await?;
        Ok(user)
    }

    async fn abandon(&self, subject: &AttemptSubject) {
        if let Err(err) = self.lockout.abandon_attempt(subject).await {
            warn!(%subject, error = %err, "could not withdraw unsettled attempt");
        }
    }

    async fn check_password(
        &self,
        credential: &PasswordCredential,
    ) -> Result<ApplicationUser, Rejection> {
        let Some(user) = self
            .identities
            .find_by_username(credential.username())
            .await?
        else {
            self.identities
                .verify_decoy(credential.password().expose())
                .await?;
            return Err(Rejection::Invalid(InvalidReason::UnknownUser));
        };
        if self
            .identities
            .verify_password(user.id(), credential.password())
            .await?
        {
            Ok(user)
        } else {
            Err(Rejection::Invalid(InvalidReason::WrongSecret))
        }
    }

    async fn check_pin(&self, credential: &PinCredential) -> Result<ApplicationUser, Rejection> {
        let Some(user) = self
            .identities
            .find_by_device(credential.device_id())
            .await?
        else {
            self.identities.verify_decoy(credential.pin().expose()).await?;
            return Err(Rejection::Invalid(InvalidReason::UnknownDevice));
        };
        if self.identities.verify_pin(user.id(), credential.pin()).await? {
            Ok(user)
        } else {
            Err(Rejection::Invalid(InvalidReason::WrongSecret))
        }
    }

    async fn ensure_household_active(&self, user: &ApplicationUser) -> Result<(), Rejection> {
        let Some(household_id) = user.household_id() else {
            return Ok(());
        };
        match self.identities.find_household(household_id).await? {
            Some(household) if household.is_active() => Ok(()),
            Some(_) => Err(Rejection::Invalid(InvalidReason::HouseholdInactive)),
            None => Err(Rejection::Invalid(InvalidReason::HouseholdMissing)),
        }
    }

    async fn remember_device_if_requested(&self, user_id: &UserId, credential: &PasswordCredential) {
        if !credential.remember_device() {
            return;
        }
        let Some(device_id) = credential.device_id() else {
            return;
        };
        if let Err(err) = self.devices.remember_device(user_id, device_id).await {
            warn!(user_id = %user_id, error = %err, "could not remember device");
        }
    }

    fn reject(subject: &AttemptSubject, rejection: Rejection) -> Result<AuthResult, Error> {
        match rejection {
            Rejection::Locked => {
                info!(%subject, reason = "locked_out", "sign-in refused");
                Ok(AuthResult::fail_with_default_message(
                    AuthErrorCode::AccountLocked,
                ))
            }
            Rejection::Invalid(reason) => {
                info!(%subject, reason = reason.as_str(), "sign-in refused");
                Ok(AuthResult::fail_with_default_message(
                    AuthErrorCode::InvalidCredentials,
                ))
            }
            Rejection::Unavailable => Ok(AuthResult::fail_with_default_message(
                AuthErrorCode::Unavailable,
            )),
            Rejection::Defect(err) => Err(err),
        }
    }
}

#[async_trait]
impl LoginService for Authenticator {
    async fn authenticate(&self, credential: &Credential) -> Result<AuthResult, Error> {
        let subject = attempt_subject(credential);
        match self.attempt(credential, &subject).await {
            Ok(user) => {
                info!(%subject, user_id = %user.id(), "sign-in succeeded");
                Ok(AuthResult::ok(UserSummary::from(user)))
            }
            Err(rejection) => Self::reject(&subject, rejection),
        }
    }
}

/// [`PrincipalResolver`] backed by the identity store.
///
/// Sessions whose user has vanished or whose household has been deactivated
/// since sign-in no longer resolve.
#[derive(Clone)]
pub struct IdentityPrincipalResolver {
    identities: Arc<dyn IdentityStore>,
}

impl IdentityPrincipalResolver {
    /// Build a resolver over `identities`.
    pub fn new(identities: Arc<dyn IdentityStore>) -> Self {
        Self { identities }
    }
}

fn context_failure(err: IdentityStoreError) -> ContextFailure {
    match err {
        IdentityStoreError::Unavailable { message } => ContextFailure::Unavailable { message },
        IdentityStoreError::Query { message } => ContextFailure::Internal { message },
    }
}

#[async_trait]
impl PrincipalResolver for IdentityPrincipalResolver {
    async fn resolve(&self, principal: &UserId) -> Result<UserSummary, ContextFailure> {
        let user = self
            .identities
            .find_by_id(principal)
            .await
            .map_err(context_failure)?
            .ok_or(ContextFailure::UnknownPrincipal)?;

        if let Some(household_id) = user.household_id() {
            let household = self
                .identities
                .find_household(household_id)
                .await
                .map_err(context_failure)?;
            if !household.is_some_and(|household| household.is_active()) {
                info!(user_id = %principal, "session principal's household is inactive");
                return Err(ContextFailure::HouseholdInactive);
            }
        }
        Ok(UserSummary::from(user))
    }
}

#[cfg(test)]
#[path = "authenticator_tests.rs"]
mod tests;
