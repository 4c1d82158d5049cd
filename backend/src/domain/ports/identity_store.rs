//! Port abstraction for the external identity store.
//!
//! The identity store owns user records, secret hashes, remembered devices
//! and household records. The authentication core only reads through this
//! port; every call may fail with an opaque "unavailable" condition.

use async_trait::async_trait;

use crate::domain::{
    ApplicationUser, DeviceId, Household, HouseholdId, Password, Pin, UserId, UserName,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// Store could not be reached; callers may retry.
        Unavailable { message: String } => "identity store unavailable: {message}",
        /// Lookup failed unexpectedly.
        Query { message: String } => "identity store query failed: {message}",
    }
}

/// Read access to identity records and secret verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an identity record by sign-in name.
    async fn find_by_username(
        &self,
        user_name: &UserName,
    ) -> Result<Option<ApplicationUser>, IdentityStoreError>;

    /// Fetch an identity record by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ApplicationUser>, IdentityStoreError>;

    /// Fetch the user a remembered device is bound to.
    async fn find_by_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<ApplicationUser>, IdentityStoreError>;

    /// Check `password` against the user's stored password hash.
    async fn verify_password(
        &self,
        user_id: &UserId,
        password: &Password,
    ) -> Result<bool, IdentityStoreError>;

    /// Check `pin` against the user's stored PIN hash.
    async fn verify_pin(&self, user_id: &UserId, pin: &Pin) -> Result<bool, IdentityStoreError>;

    /// Spend the cost of one secret verification without matching anyone.
    ///
    /// Called when no user or device matches, so unknown names take as long
    /// to refuse as wrong secrets.
    async fn verify_decoy(&self, secret: &str) -> Result<(), IdentityStoreError>;

    /// Fetch a household, including its active flag.
    async fn find_household(
        &self,
        id: &HouseholdId,
    ) -> Result<Option<Household>, IdentityStoreError>;
}
