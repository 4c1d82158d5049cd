//! Domain primitives, aggregates and services for household authentication.
//!
//! Purpose: define the credential, identity, household and scoping types the
//! rest of the crate builds on, together with the [`Authenticator`] and
//! [`CurrentUserContext`] services. Types are immutable once constructed;
//! invariants and serde contracts are documented on each type.
//!
//! Public surface:
//! - Credential / RawCredential: sign-in proofs, validated before lookup.
//! - AuthResult / AuthErrorCode: structured sign-in outcome.
//! - ApplicationUser / UserSummary: identity record and its projection.
//! - Household / HouseholdId: tenancy boundary.
//! - CurrentUserContext / HouseholdScope: per-request identity and scoping.
//! - Error / ErrorCode: API error payload.

pub mod auth_result;
pub mod authenticator;
pub mod credential;
pub mod error;
pub mod household;
pub mod ports;
pub mod record;
pub mod scope;
pub mod user;
pub mod user_context;

pub use self::auth_result::{
    ACCOUNT_LOCKED_MESSAGE, AuthErrorCode, AuthFailure, AuthResult, AuthResultShapeError,
    INVALID_CREDENTIALS_MESSAGE, INVALID_FORMAT_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use self::authenticator::{Authenticator, IdentityPrincipalResolver};
pub use self::credential::{
    Credential, CredentialValidationError, DeviceId, PIN_LENGTH, Password, PasswordCredential,
    Pin, PinCredential, RawCredential, is_well_formed_pin,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::household::{
    HOUSEHOLD_NAME_MAX, Household, HouseholdId, HouseholdName, HouseholdValidationError,
};
pub use self::record::{
    HouseholdOwned, HouseholdRecord, RECORD_TITLE_MAX, RecordId, RecordTitle,
    RecordValidationError,
};
pub use self::scope::{HouseholdScope, ScopeViolation};
pub use self::user::{ApplicationUser, Role, UserId, UserName, UserSummary, UserValidationError};
pub use self::user_context::{
    ContextFailure, ContextPhase, ContextUninitialized, CurrentUserContext,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use hearth::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
