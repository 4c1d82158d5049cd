//! In-memory adapters for the driven ports.
//!
//! These back the binary and the test suites; nothing here survives a
//! restart.

mod demo;
mod identity_store;
mod lockout;
mod record_repository;

pub use demo::{
    DEMO_ADMIN_PASSWORD, DEMO_ADMIN_USERNAME, DEMO_MEMBER_PASSWORD, DEMO_MEMBER_PIN,
    DEMO_MEMBER_USERNAME, DemoSeed, seed_demo,
};
pub use identity_store::{InMemoryIdentityStore, ProvisioningError};
pub use lockout::{InMemoryLockoutPolicy, LockoutConfig};
pub use record_repository::InMemoryRecordRepository;
