//! Credential variants submitted for sign-in.
//!
//! Inbound payload parsing stays outside the domain: adapters hand raw strings
//! to [`RawCredential`] and the conversion into [`Credential`] performs the
//! structural checks. The checks are pure and run before any lookup, so a
//! malformed PIN never reaches the identity store.

use std::fmt;

use zeroize::Zeroizing;

use super::UserName;

/// Number of digits in a sign-in PIN.
pub const PIN_LENGTH: usize = 4;

/// Structural validation failures for credential payloads.
///
/// Messages never echo the submitted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// PIN was not exactly four ASCII digits.
    InvalidPin,
    /// Device identifier was blank.
    EmptyDeviceId,
    /// "Remember this device" was requested without a device identifier.
    MissingDeviceId,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidPin => write!(f, "PIN must be exactly {PIN_LENGTH} digits"),
            Self::EmptyDeviceId => write!(f, "device id must not be empty"),
            Self::MissingDeviceId => {
                write!(f, "a device id is required to remember this device")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Opaque identifier of a client device, supplied by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and construct a [`DeviceId`]; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CredentialValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CredentialValidationError::EmptyDeviceId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Four-digit sign-in PIN.
///
/// # Examples
/// ```
/// use hearth::domain::Pin;
///
/// assert!(Pin::parse("1234").is_ok());
/// assert!(Pin::parse("12").is_err());
/// assert!(Pin::parse("12a4").is_err());
/// assert!(Pin::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(Zeroizing<String>);

impl Pin {
    /// Accept exactly [`PIN_LENGTH`] ASCII decimal digits and nothing else.
    pub fn parse(raw: &str) -> Result<Self, CredentialValidationError> {
        if !is_well_formed_pin(raw) {
            return Err(CredentialValidationError::InvalidPin);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Digits as submitted.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Pure PIN shape check: `"1234"` passes, `"12"`, `"12a4"` and `""` do not.
pub fn is_well_formed_pin(raw: &str) -> bool {
    raw.chars().count() == PIN_LENGTH && raw.chars().all(|c| c.is_ascii_digit())
}

/// Password secret; passed through opaquely to the identity store.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a caller-supplied password. No policy is applied here.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Password string provided by the caller.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Username and password sign-in.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `remember_device` implies `device_id` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    username: UserName,
    password: Password,
    remember_device: bool,
    device_id: Option<DeviceId>,
}

impl PasswordCredential {
    /// Construct a password credential from raw inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        remember_device: bool,
        device_id: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let username =
            UserName::new(username).map_err(|_| CredentialValidationError::EmptyUsername)?;
        let device_id = device_id.map(DeviceId::new).transpose()?;
        if remember_device && device_id.is_none() {
            return Err(CredentialValidationError::MissingDeviceId);
        }

        Ok(Self {
            username,
            password: Password::new(password),
            remember_device,
            device_id,
        })
    }

    /// Username suitable for identity lookups.
    pub fn username(&self) -> &UserName {
        &self.username
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Whether the caller asked to remember this device.
    pub fn remember_device(&self) -> bool {
        self.remember_device
    }

    /// Device the request originated from, when known.
    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }
}

/// PIN sign-in on a previously remembered device.
///
/// PINs are not globally unique, so the device id is always part of the
/// credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinCredential {
    device_id: DeviceId,
    pin: Pin,
}

impl PinCredential {
    /// Construct a PIN credential from raw inputs.
    pub fn try_from_parts(device_id: &str, pin: &str) -> Result<Self, CredentialValidationError> {
        let pin = Pin::parse(pin)?;
        let device_id = DeviceId::new(device_id)?;
        Ok(Self { device_id, pin })
    }

    /// Remembered device the PIN is bound to.
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Submitted PIN.
    pub fn pin(&self) -> &Pin {
        &self.pin
    }
}

/// Proof of identity for one sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Password(PasswordCredential),
    Pin(PinCredential),
}

/// Unvalidated credential payload as received from an inbound adapter.
#[derive(Clone, PartialEq, Eq)]
pub enum RawCredential {
    Password {
        username: String,
        password: Zeroizing<String>,
        remember_device: bool,
        device_id: Option<String>,
    },
    Pin {
        device_id: String,
        pin: Zeroizing<String>,
    },
}

impl fmt::Debug for RawCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { remember_device, .. } => f
                .debug_struct("Password")
                .field("remember_device", remember_device)
                .finish_non_exhaustive(),
            Self::Pin { .. } => f.debug_struct("Pin").finish_non_exhaustive(),
        }
    }
}

impl TryFrom<RawCredential> for Credential {
    type Error = CredentialValidationError;

    fn try_from(value: RawCredential) -> Result<Self, Self::Error> {
        match value {
            RawCredential::Password {
                username,
                password,
                remember_device,
                device_id,
            } => PasswordCredential::try_from_parts(
                &username,
                &password,
                remember_device,
                device_id.as_deref(),
            )
            .map(Self::Password),
            RawCredential::Pin { device_id, pin } => {
                PinCredential::try_from_parts(&device_id, &pin).map(Self::Pin)
            }
        }
    }
}
