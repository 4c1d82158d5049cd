//! Inbound HTTP adapter.
//!
//! Handlers translate requests into domain calls and map results back to
//! HTTP. Every household-scoped handler takes a
//! [`UserContext`](context::UserContext), which resolves the caller once per
//! request and hands out the scope data access must use.

pub mod auth;
pub mod context;
pub mod error;
pub mod health;
pub mod me;
pub mod records;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
