//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`IdentityStore`], [`LockoutPolicy`], [`DeviceBindingStore`],
//! [`PrincipalResolver`], [`HouseholdRecordRepository`]) describe what the
//! authentication core needs from the outside world. [`LoginService`] is the
//! driving port inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod device_binding;
mod household_record_repository;
mod identity_store;
mod lockout_policy;
mod login_service;
mod principal_resolver;

#[cfg(test)]
pub use device_binding::MockDeviceBindingStore;
pub use device_binding::{DeviceBindingError, DeviceBindingStore};
#[cfg(test)]
pub use household_record_repository::MockHouseholdRecordRepository;
pub use household_record_repository::{HouseholdRecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError};
#[cfg(test)]
pub use lockout_policy::MockLockoutPolicy;
pub use lockout_policy::{
    AttemptAdmission, AttemptSubject, LockoutError, LockoutPolicy, NoLockoutPolicy,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use principal_resolver::MockPrincipalResolver;
pub use principal_resolver::PrincipalResolver;
