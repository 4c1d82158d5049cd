//! Outcome of a sign-in attempt.
//!
//! [`AuthResult`] has exactly two branches. Success carries the resolved
//! [`UserSummary`]; failure carries a machine-readable [`AuthErrorCode`] and a
//! message that is safe to show to an unauthenticated caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserSummary;

/// Shown for malformed credentials.
pub const INVALID_FORMAT_MESSAGE: &str = "The sign-in details are not in a recognised format.";
/// Shown for every lookup or verification failure, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Sign-in failed. Check your details and try again.";
/// Shown while the lockout collaborator reports the subject as locked.
pub const ACCOUNT_LOCKED_MESSAGE: &str =
    "Too many unsuccessful sign-in attempts. Try again later.";
/// Shown when the identity store cannot be reached.
pub const UNAVAILABLE_MESSAGE: &str =
    "Sign-in is temporarily unavailable. Try again shortly.";

/// Failure categories that may cross into an [`AuthResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthErrorCode {
    /// Credential failed local structural validation.
    InvalidFormat,
    /// Unknown user, wrong secret, or inactive household.
    InvalidCredentials,
    /// Lockout collaborator reports too many failures.
    AccountLocked,
    /// Identity store unreachable; the caller may retry.
    Unavailable,
}

impl AuthErrorCode {
    /// Machine-readable string form, e.g. `"InvalidCredentials"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "InvalidFormat",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::AccountLocked => "AccountLocked",
            Self::Unavailable => "Unavailable",
        }
    }

    /// Canonical user-facing message for this code.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidFormat => INVALID_FORMAT_MESSAGE,
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            Self::AccountLocked => ACCOUNT_LOCKED_MESSAGE,
            Self::Unavailable => UNAVAILABLE_MESSAGE,
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure branch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    error_code: AuthErrorCode,
    user_facing_message: String,
}

impl AuthFailure {
    /// Machine-readable failure code.
    pub fn error_code(&self) -> AuthErrorCode {
        self.error_code
    }

    /// Message safe to display to the caller.
    pub fn user_facing_message(&self) -> &str {
        self.user_facing_message.as_str()
    }
}

/// Outcome of an authentication attempt.
///
/// # Examples
/// ```
/// use hearth::domain::{AuthErrorCode, AuthResult};
///
/// let failed = AuthResult::fail(AuthErrorCode::InvalidCredentials, "nope");
/// assert!(!failed.is_success());
/// assert!(failed.user().is_none());
/// assert_eq!(failed.error_code(), Some(AuthErrorCode::InvalidCredentials));
/// assert_eq!(failed.user_facing_message(), Some("nope"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthResultDto", into = "AuthResultDto")]
pub enum AuthResult {
    Success(UserSummary),
    Failure(AuthFailure),
}

impl AuthResult {
    /// Successful sign-in for `user`.
    pub fn ok(user: UserSummary) -> Self {
        Self::Success(user)
    }

    /// Failed sign-in; `code` and `message` are stored unmodified.
    pub fn fail(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self::Failure(AuthFailure {
            error_code: code,
            user_facing_message: message.into(),
        })
    }

    /// Failed sign-in using the canonical message for `code`.
    pub fn fail_with_default_message(code: AuthErrorCode) -> Self {
        Self::fail(code, code.default_message())
    }

    /// Whether the attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Resolved user on success.
    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            Self::Success(user) => Some(user),
            Self::Failure(_) => None,
        }
    }

    /// Failure code on failure.
    pub fn error_code(&self) -> Option<AuthErrorCode> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.error_code),
        }
    }

    /// User-facing message on failure.
    pub fn user_facing_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.user_facing_message()),
        }
    }

    /// Consume the result, yielding the summary on success.
    pub fn into_user(self) -> Option<UserSummary> {
        match self {
            Self::Success(user) => Some(user),
            Self::Failure(_) => None,
        }
    }
}

/// Raised when a serialised result populates both or neither branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResultShapeError;

impl fmt::Display for AuthResultShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "auth result must carry either a user or an error code and message"
        )
    }
}

impl std::error::Error for AuthResultShapeError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResultDto {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<AuthErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_facing_message: Option<String>,
}

impl From<AuthResult> for AuthResultDto {
    fn from(value: AuthResult) -> Self {
        match value {
            AuthResult::Success(user) => Self {
                success: true,
                user: Some(user),
                error_code: None,
                user_facing_message: None,
            },
            AuthResult::Failure(failure) => Self {
                success: false,
                user: None,
                error_code: Some(failure.error_code),
                user_facing_message: Some(failure.user_facing_message),
            },
        }
    }
}

impl TryFrom<AuthResultDto> for AuthResult {
    type Error = AuthResultShapeError;

    fn try_from(value: AuthResultDto) -> Result<Self, Self::Error> {
        match value {
            AuthResultDto {
                success: true,
                user: Some(user),
                error_code: None,
                user_facing_message: None,
            } => Ok(Self::ok(user)),
            AuthResultDto {
                success: false,
                user: None,
                error_code: Some(code),
                user_facing_message: Some(message),
            } => Ok(Self::fail(code, message)),
            _ => Err(AuthResultShapeError),
        }
    }
}
