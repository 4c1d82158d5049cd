//! Household-scoped authentication service.
//!
//! The [`domain`] owns credentials, identities and per-request user
//! contexts; [`inbound`] adapts them to HTTP and [`outbound`] supplies the
//! in-memory stores the binary runs on.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
