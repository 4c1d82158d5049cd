//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local identity store, lockout tracker and record
//!   repository.
//! - **secrets**: Argon2id hashing used by identity adapters.
//!
//! Adapters translate between domain types and their storage representation
//! and hold no authentication rules of their own.

pub mod memory;
pub mod secrets;
