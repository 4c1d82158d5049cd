//! User identity model: identifiers, names, roles, identity records and the
//! summary projection handed out on successful sign-in.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HouseholdId;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUserName,
    EmptyRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUserName => write!(f, "username must not be empty"),
            Self::EmptyRole => write!(f, "role name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Sign-in name. Trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role name used for authorisation checks, e.g. `Parent` or `Child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Validate and construct a [`Role`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyRole);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The `Parent` role.
    pub fn parent() -> Self {
        Self("Parent".to_owned())
    }

    /// The `Child` role.
    pub fn child() -> Self {
        Self("Child".to_owned())
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

impl TryFrom<String> for Role {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity record owned by the identity store.
///
/// ## Invariants
/// - `household_id == None` marks a platform administrator exempt from
///   household scoping.
/// - The household binding is fixed at provisioning; there is no setter.
///
/// # Examples
/// ```
/// use hearth::domain::{ApplicationUser, HouseholdId, Role, UserId, UserName};
///
/// let household = HouseholdId::random();
/// let user = ApplicationUser::member(
///     UserId::random(),
///     UserName::new("alice").expect("valid name"),
///     household,
///     [Role::parent()],
/// );
/// assert!(!user.is_admin());
/// assert_eq!(user.household_id(), Some(&household));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationUser {
    id: UserId,
    user_name: UserName,
    household_id: Option<HouseholdId>,
    roles: BTreeSet<Role>,
}

impl ApplicationUser {
    /// Provision a household member.
    pub fn member(
        id: UserId,
        user_name: UserName,
        household_id: HouseholdId,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id,
            user_name,
            household_id: Some(household_id),
            roles: roles.into_iter().collect(),
        }
    }

    /// Provision a platform administrator with no household binding.
    pub fn administrator(
        id: UserId,
        user_name: UserName,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id,
            user_name,
            household_id: None,
            roles: roles.into_iter().collect(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Sign-in name.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Household binding; `None` for administrators.
    pub fn household_id(&self) -> Option<&HouseholdId> {
        self.household_id.as_ref()
    }

    /// Assigned roles.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Whether this record belongs to a platform administrator.
    pub fn is_admin(&self) -> bool {
        self.household_id.is_none()
    }
}

/// Minimal identity projection returned by a successful sign-in.
///
/// Roles compare as a set, so ordering never affects equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    user_id: UserId,
    user_name: UserName,
    roles: BTreeSet<Role>,
    household_id: Option<HouseholdId>,
}

impl UserSummary {
    /// Stable user identifier.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Sign-in name.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Assigned roles.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Tenant id; `None` only for administrators.
    pub fn household_id(&self) -> Option<&HouseholdId> {
        self.household_id.as_ref()
    }

    /// Whether the summary describes an administrator.
    pub fn is_admin(&self) -> bool {
        self.household_id.is_none()
    }

    /// Whether the user holds `role`.
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

impl From<&ApplicationUser> for UserSummary {
    fn from(user: &ApplicationUser) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.user_name.clone(),
            roles: user.roles.clone(),
            household_id: user.household_id,
        }
    }
}

impl From<ApplicationUser> for UserSummary {
    fn from(user: ApplicationUser) -> Self {
        let ApplicationUser {
            id,
            user_name,
            household_id,
            roles,
        } = user;
        Self {
            user_id: id,
            user_name,
            roles,
            household_id,
        }
    }
}

#[cfg(test)]
mod tests;
