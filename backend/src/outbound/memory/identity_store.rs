//! Process-local identity store.
//!
//! Holds households, users, Argon2 secret hashes and remembered devices in
//! memory. Implements both [`IdentityStore`] and [`DeviceBindingStore`]. The
//! availability switch lets callers simulate an unreachable store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    DeviceBindingError, DeviceBindingStore, IdentityStore, IdentityStoreError,
};
use crate::domain::{
    ApplicationUser, CredentialValidationError, DeviceId, Household, HouseholdId, Password, Pin,
    UserId, UserName,
};
use crate::outbound::secrets::{SecretHash, SecretHashError, hash_secret, verify_secret};

/// Errors raised while provisioning the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    /// The user references a household that was never added.
    #[error("household {0} is not provisioned")]
    UnknownHousehold(HouseholdId),
    /// Another user already signs in with this name.
    #[error("username {0} is already taken")]
    DuplicateUserName(UserName),
    /// The initial PIN is not four digits.
    #[error("invalid PIN: {0}")]
    InvalidPin(CredentialValidationError),
    /// Hashing a secret failed.
    #[error(transparent)]
    Secret(#[from] SecretHashError),
    /// Provisioning data failed validation.
    #[error("invalid provisioning data: {message}")]
    Invalid { message: String },
    /// Store state is unusable after a panic.
    #[error("identity store state poisoned")]
    Poisoned,
}

const DECOY_SECRET: &str = "hearth-decoy-secret";

/// Hash verified against when no stored secret exists.
fn decoy_hash() -> Option<&'static SecretHash> {
    static DECOY: OnceLock<Option<SecretHash>> = OnceLock::new();
    DECOY
        .get_or_init(|| match hash_secret(DECOY_SECRET) {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!(error = %err, "could not prepare decoy hash");
                None
            }
        })
        .as_ref()
}

struct StoredUser {
    user: ApplicationUser,
    password: SecretHash,
    pin: Option<SecretHash>,
}

#[derive(Default)]
struct Directory {
    households: HashMap<HouseholdId, Household>,
    users: HashMap<UserId, StoredUser>,
    by_name: HashMap<UserName, UserId>,
    devices: HashMap<DeviceId, UserId>,
}

/// In-memory identity store.
///
/// # Examples
/// ```
/// use hearth::domain::{ApplicationUser, Household, HouseholdName, Role, UserId, UserName};
/// use hearth::outbound::memory::InMemoryIdentityStore;
/// use mockable::DefaultClock;
///
/// let store = InMemoryIdentityStore::new();
/// let name = HouseholdName::new("Smith Family").expect("valid name");
/// let household = Household::create(name, &DefaultClock);
/// let member = ApplicationUser::member(
///     UserId::random(),
///     UserName::new("jane").expect("valid name"),
///     *household.id(),
///     [Role::parent()],
/// );
/// store.add_household(household).expect("household added");
/// store
///     .add_user(member, "correct horse", Some("2468"))
///     .expect("user added");
/// ```
pub struct InMemoryIdentityStore {
    directory: RwLock<Directory>,
    available: AtomicBool,
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle whether port calls succeed or report the store unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Add or replace a household.
    pub fn add_household(&self, household: Household) -> Result<(), ProvisioningError> {
        let mut directory = self.write()?;
        directory.households.insert(*household.id(), household);
        Ok(())
    }

    /// Mark a household inactive; existing users can no longer sign in.
    pub fn deactivate_household(&self, id: &HouseholdId) -> Result<(), ProvisioningError> {
        let mut directory = self.write()?;
        let household = directory
            .households
            .get_mut(id)
            .ok_or(ProvisioningError::UnknownHousehold(*id))?;
        household.deactivate();
        Ok(())
    }

    /// Provision a user with a password and optional PIN.
    ///
    /// Secrets are hashed before the directory lock is taken.
    pub fn add_user(
        &self,
        user: ApplicationUser,
        password: &str,
        pin: Option<&str>,
    ) -> Result<(), ProvisioningError> {
        let pin_hash = pin
            .map(|raw| {
                let pin = Pin::parse(raw).map_err(ProvisioningError::InvalidPin)?;
                hash_secret(pin.expose()).map_err(ProvisioningError::from)
            })
            .transpose()?;
        let password_hash = hash_secret(password)?;

        let mut directory = self.write()?;
        if let Some(household) = user.household_id() {
            if !directory.households.contains_key(household) {
                return Err(ProvisioningError::UnknownHousehold(*household));
            }
        }
        if directory.by_name.contains_key(user.user_name()) {
            return Err(ProvisioningError::DuplicateUserName(user.user_name().clone()));
        }
        directory
            .by_name
            .insert(user.user_name().clone(), user.id().clone());
        directory.users.insert(
            user.id().clone(),
            StoredUser {
                user,
                password: password_hash,
                pin: pin_hash,
            },
        );
        Ok(())
    }

    fn ensure_available(&self) -> Result<(), IdentityStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(IdentityStoreError::unavailable("identity store offline"))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Directory>, IdentityStoreError> {
        self.directory
            .read()
            .map_err(|_| IdentityStoreError::query("identity store state poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Directory>, ProvisioningError> {
        self.directory
            .write()
            .map_err(|_| ProvisioningError::Poisoned)
    }

    fn lookup<T>(
        &self,
        project: impl FnOnce(&Directory) -> Option<T>,
    ) -> Result<Option<T>, IdentityStoreError> {
        self.ensure_available()?;
        let directory = self.read()?;
        Ok(project(&directory))
    }

    async fn verify(
        &self,
        user_id: &UserId,
        secret: &str,
        select: impl FnOnce(&StoredUser) -> Option<SecretHash>,
    ) -> Result<bool, IdentityStoreError> {
        let Some(hash) = self.lookup(|directory| directory.users.get(user_id).and_then(select))?
        else {
            debug!(%user_id, "no stored secret to verify against");
            run_decoy(secret).await?;
            return Ok(false);
        };
        check_in_background(secret, hash).await
    }
}

async fn check_in_background(secret: &str, hash: SecretHash) -> Result<bool, IdentityStoreError> {
    let secret = Zeroizing::new(secret.to_owned());
    tokio::task::spawn_blocking(move || verify_secret(&secret, &hash))
        .await
        .map_err(|err| IdentityStoreError::query(err.to_string()))?
        .map_err(|err| IdentityStoreError::query(err.to_string()))
}

async fn run_decoy(secret: &str) -> Result<(), IdentityStoreError> {
    if let Some(hash) = decoy_hash() {
        check_in_background(secret, hash.clone()).await?;
    }
    Ok(())
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_username(
        &self,
        user_name: &UserName,
    ) -> Result<Option<ApplicationUser>, IdentityStoreError> {
        self.lookup(|directory| {
            directory
                .by_name
                .get(user_name)
                .and_then(|id| directory.users.get(id))
                .map(|stored| stored.user.clone())
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<ApplicationUser>, IdentityStoreError> {
        self.lookup(|directory| directory.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<ApplicationUser>, IdentityStoreError> {
        self.lookup(|directory| {
            directory
                .devices
                .get(device_id)
                .and_then(|id| directory.users.get(id))
                .map(|stored| stored.user.clone())
        })
    }

    async fn verify_password(
        &self,
        user_id: &UserId,
        password: &Password,
    ) -> Result<bool, IdentityStoreError> {
        self.verify(user_id, password.expose(), |stored| {
            Some(stored.password.clone())
        })
        .await
    }

    async fn verify_pin(&self, user_id: &UserId, pin: &Pin) -> Result<bool, IdentityStoreError> {
        self.verify(user_id, pin.expose(), |stored| stored.pin.clone())
            .await
    }

    async fn verify_decoy(&self, secret: &str) -> Result<(), IdentityStoreError> {
        self.ensure_available()?;
        run_decoy(secret).await
    }

    async fn find_household(
        &self,
        id: &HouseholdId,
    ) -> Result<Option<Household>, IdentityStoreError> {
        self.lookup(|directory| directory.households.get(id).cloned())
    }
}

#[async_trait]
impl DeviceBindingStore for InMemoryIdentityStore {
    async fn remember_device(
        &self,
        user_id: &UserId,
        device_id: &DeviceId,
    ) -> Result<(), DeviceBindingError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DeviceBindingError::unavailable("identity store offline"));
        }
        let mut directory = self
            .directory
            .write()
            .map_err(|_| DeviceBindingError::unavailable("identity store state poisoned"))?;
        directory.devices.insert(device_id.clone(), user_id.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "identity_store_tests.rs"]
mod tests;
