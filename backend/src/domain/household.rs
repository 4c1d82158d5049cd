//! Household (tenant) model.
//!
//! A household is the unit of data isolation: every non-administrator user
//! belongs to exactly one, and every household-owned record carries its id.

use std::fmt;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by household constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HouseholdValidationError {
    EmptyId,
    InvalidId,
    NilId,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for HouseholdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "household id must not be empty"),
            Self::InvalidId => write!(f, "household id must be a valid UUID"),
            Self::NilId => write!(f, "household id must not be the nil UUID"),
            Self::EmptyName => write!(f, "household name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "household name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for HouseholdValidationError {}

/// Stable household identifier. Never the nil UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HouseholdId(Uuid);

impl HouseholdId {
    /// Validate and construct a [`HouseholdId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, HouseholdValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(HouseholdValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(HouseholdValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| HouseholdValidationError::InvalidId)?;
        Self::from_uuid(parsed)
    }

    /// Wrap an existing UUID, rejecting the nil value.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, HouseholdValidationError> {
        if uuid.is_nil() {
            return Err(HouseholdValidationError::NilId);
        }
        Ok(Self(uuid))
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<HouseholdId> for String {
    fn from(value: HouseholdId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for HouseholdId {
    type Error = HouseholdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a household name.
pub const HOUSEHOLD_NAME_MAX: usize = 80;

/// Display name for a household, e.g. "Smith Family".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HouseholdName(String);

impl HouseholdName {
    /// Validate and construct a [`HouseholdName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, HouseholdValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(HouseholdValidationError::EmptyName);
        }
        if trimmed.chars().count() > HOUSEHOLD_NAME_MAX {
            return Err(HouseholdValidationError::NameTooLong {
                max: HOUSEHOLD_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for HouseholdName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for HouseholdName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<HouseholdName> for String {
    fn from(value: HouseholdName) -> Self {
        value.0
    }
}

impl TryFrom<String> for HouseholdName {
    type Error = HouseholdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Tenant boundary entity.
///
/// ## Invariants
/// - `id` is never the nil UUID.
/// - `created_at` is fixed when the household is created.
/// - Inactive households must be denied new sessions.
///
/// # Examples
/// ```
/// use hearth::domain::{Household, HouseholdName};
/// use mockable::DefaultClock;
///
/// let name = HouseholdName::new("Smith Family").expect("valid name");
/// let household = Household::create(name, &DefaultClock);
/// assert!(household.is_active());
/// assert!(!household.id().as_uuid().is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    id: HouseholdId,
    name: HouseholdName,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Household {
    /// Create a new active household with a freshly minted id.
    pub fn create(name: HouseholdName, clock: &dyn Clock) -> Self {
        Self {
            id: HouseholdId::random(),
            name,
            is_active: true,
            created_at: clock.utc(),
        }
    }

    /// Rehydrate a household from stored components.
    pub fn restore(
        id: HouseholdId,
        name: HouseholdName,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            is_active,
            created_at,
        }
    }

    /// Stable household identifier.
    pub fn id(&self) -> &HouseholdId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &HouseholdName {
        &self.name
    }

    /// Whether members may start new sessions.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Deny new sessions for this household.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Allow new sessions again.
    pub fn activate(&mut self) {
        self.is_active = true;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use mockable::MockClock;
    use rstest::rstest;

    #[rstest]
    #[case("", HouseholdValidationError::EmptyId)]
    #[case("not-a-uuid", HouseholdValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", HouseholdValidationError::InvalidId)]
    #[case("00000000-0000-0000-0000-000000000000", HouseholdValidationError::NilId)]
    fn household_id_rejects_invalid_values(
        #[case] raw: &str,
        #[case] expected: HouseholdValidationError,
    ) {
        let err = HouseholdId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn household_id_round_trips_through_string() {
        let id = HouseholdId::random();
        let parsed = HouseholdId::new(id.to_string()).expect("valid id");
        assert_eq!(parsed, id);
    }

    #[rstest]
    #[case("   ", HouseholdValidationError::EmptyName)]
    #[case("", HouseholdValidationError::EmptyName)]
    fn household_name_rejects_blank(#[case] raw: &str, #[case] expected: HouseholdValidationError) {
        assert_eq!(HouseholdName::new(raw).expect_err("blank"), expected);
    }

    #[rstest]
    fn household_name_rejects_overlong() {
        let raw = "a".repeat(HOUSEHOLD_NAME_MAX + 1);
        assert_eq!(
            HouseholdName::new(raw).expect_err("too long"),
            HouseholdValidationError::NameTooLong {
                max: HOUSEHOLD_NAME_MAX
            }
        );
    }

    #[rstest]
    fn create_stamps_clock_time_and_fresh_id() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);

        let name = HouseholdName::new("  Smith Family ").expect("valid name");
        let first = Household::create(name.clone(), &clock);
        let second = Household::create(name, &clock);

        assert_eq!(first.name().as_ref(), "Smith Family");
        assert_eq!(first.created_at(), now);
        assert!(first.is_active());
        assert!(!first.id().as_uuid().is_nil());
        assert_ne!(first.id(), second.id());
    }

    #[rstest]
    fn deactivate_keeps_identity_and_creation_time() {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(Utc::now());
        let mut household =
            Household::create(HouseholdName::new("Jones").expect("name"), &clock);
        let (id, created_at) = (*household.id(), household.created_at());

        household.deactivate();
        assert!(!household.is_active());
        assert_eq!(household.id(), &id);
        assert_eq!(household.created_at(), created_at);

        household.activate();
        assert!(household.is_active());
    }
}
