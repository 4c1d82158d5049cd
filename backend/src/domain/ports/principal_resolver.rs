//! Port resolving an authenticated session principal into a user summary.
//!
//! [`CurrentUserContext`](crate::domain::CurrentUserContext) awaits this port
//! exactly once per request; it is the context's only suspend point.

use async_trait::async_trait;

use crate::domain::{ContextFailure, UserId, UserSummary};

/// Resolves the principal carried by a session into its current identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Resolve `principal`, failing when it no longer maps to a usable identity.
    async fn resolve(&self, principal: &UserId) -> Result<UserSummary, ContextFailure>;
}
