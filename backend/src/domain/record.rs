//! Household-owned records.
//!
//! A deliberately small entity used by data-access collaborators. Anything
//! that belongs to a household implements [`HouseholdOwned`] so scoped
//! filtering can be applied uniformly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HouseholdId;

/// Implemented by every record that belongs to exactly one household.
pub trait HouseholdOwned {
    /// Household the record belongs to.
    fn household_id(&self) -> &HouseholdId;
}

/// Validation errors for record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "record id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "record title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "record title must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Parse a record id from its string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| RecordValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Maximum allowed title length.
pub const RECORD_TITLE_MAX: usize = 120;

/// Short human-readable title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordTitle(String);

impl RecordTitle {
    /// Validate and construct a title; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > RECORD_TITLE_MAX {
            return Err(RecordValidationError::TitleTooLong {
                max: RECORD_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecordTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RecordTitle> for String {
    fn from(value: RecordTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecordTitle {
    type Error = RecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A record owned by one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRecord {
    id: RecordId,
    household_id: HouseholdId,
    title: RecordTitle,
    created_at: DateTime<Utc>,
}

impl HouseholdRecord {
    /// Build a record from validated components.
    pub fn new(
        id: RecordId,
        household_id: HouseholdId,
        title: RecordTitle,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            household_id,
            title,
            created_at,
        }
    }

    /// Record identifier.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Title.
    pub fn title(&self) -> &RecordTitle {
        &self.title
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl HouseholdOwned for HouseholdRecord {
    fn household_id(&self) -> &HouseholdId {
        &self.household_id
    }
}
