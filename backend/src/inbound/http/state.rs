//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{HouseholdRecordRepository, LoginService, PrincipalResolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-in use-case.
    pub login: Arc<dyn LoginService>,
    /// Resolves session principals into per-request user contexts.
    pub principals: Arc<dyn PrincipalResolver>,
    /// Household-scoped record access.
    pub records: Arc<dyn HouseholdRecordRepository>,
    /// Time source for timestamps minted by handlers.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Bundle the ports handlers depend on.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hearth::domain::ports::NoLockoutPolicy;
    /// use hearth::domain::{Authenticator, IdentityPrincipalResolver};
    /// use hearth::inbound::http::state::HttpState;
    /// use hearth::outbound::memory::{InMemoryIdentityStore, InMemoryRecordRepository};
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryIdentityStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(Authenticator::new(store.clone(), Arc::new(NoLockoutPolicy), store.clone())),
    ///     Arc::new(IdentityPrincipalResolver::new(store)),
    ///     Arc::new(InMemoryRecordRepository::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        principals: Arc<dyn PrincipalResolver>,
        records: Arc<dyn HouseholdRecordRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            login,
            principals,
            records,
            clock,
        }
    }
}
