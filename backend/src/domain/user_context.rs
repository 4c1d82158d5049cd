//! Per-request resolved identity and household scope.
//!
//! A [`CurrentUserContext`] is created for each request or session from the
//! principal carried by that session. [`CurrentUserContext::initialize`]
//! resolves the principal exactly once; concurrent callers share the single
//! in-flight resolution. Until the context is Ready every accessor returns
//! [`ContextUninitialized`], which callers must surface as an internal error.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, warn};

use super::ports::PrincipalResolver;
use super::{Error as DomainError, HouseholdId, HouseholdScope, Role, UserId, UserSummary};

/// Why a context could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextFailure {
    /// The session carries no authenticated principal.
    #[error("no authenticated principal")]
    MissingPrincipal,
    /// The principal no longer maps to an identity record.
    #[error("principal does not resolve to a known user")]
    UnknownPrincipal,
    /// The principal's household has been deactivated.
    #[error("principal's household is inactive")]
    HouseholdInactive,
    /// Identity store could not be reached.
    #[error("identity store unavailable: {message}")]
    Unavailable { message: String },
    /// Resolution was abandoned before it completed.
    #[error("context initialisation was cancelled")]
    Cancelled,
    /// Resolution failed for an unexpected reason.
    #[error("context initialisation failed: {message}")]
    Internal { message: String },
}

impl ContextFailure {
    /// Convenience constructor for [`ContextFailure::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ContextFailure::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ContextFailure> for DomainError {
    fn from(value: ContextFailure) -> Self {
        match value {
            ContextFailure::MissingPrincipal
            | ContextFailure::UnknownPrincipal
            | ContextFailure::HouseholdInactive => DomainError::unauthorized("login required"),
            ContextFailure::Unavailable { .. } => {
                DomainError::service_unavailable("identity service unavailable")
            }
            ContextFailure::Cancelled | ContextFailure::Internal { .. } => {
                DomainError::internal(value.to_string())
            }
        }
    }
}

/// Returned when an accessor runs before the context is Ready.
///
/// This is a programming defect: handlers must await
/// [`CurrentUserContext::initialize`] before touching identity data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user context accessed while {state}")]
pub struct ContextUninitialized {
    state: ContextPhase,
}

impl ContextUninitialized {
    /// Phase the context was in when it was accessed.
    pub fn phase(&self) -> ContextPhase {
        self.state
    }
}

impl From<ContextUninitialized> for DomainError {
    fn from(value: ContextUninitialized) -> Self {
        DomainError::internal(value.to_string())
    }
}

/// Lifecycle phase of a [`CurrentUserContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPhase {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl fmt::Display for ContextPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
enum ContextState {
    Uninitialized,
    Initializing,
    Ready(UserSummary),
    Failed(ContextFailure),
}

impl ContextState {
    fn phase(&self) -> ContextPhase {
        match self {
            Self::Uninitialized => ContextPhase::Uninitialized,
            Self::Initializing => ContextPhase::Initializing,
            Self::Ready(_) => ContextPhase::Ready,
            Self::Failed(_) => ContextPhase::Failed,
        }
    }
}

/// The resolved identity for one request or session.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use hearth::domain::{CurrentUserContext, UserId, ports::PrincipalResolver};
///
/// async fn greet(resolver: Arc<dyn PrincipalResolver>, principal: UserId) {
///     let context = CurrentUserContext::new(Some(principal), resolver);
///     if let Ok(summary) = context.initialize().await {
///         println!("hello {}", summary.user_name());
///     }
/// }
/// ```
pub struct CurrentUserContext {
    principal: Option<UserId>,
    resolver: Arc<dyn PrincipalResolver>,
    state: watch::Sender<ContextState>,
}

impl fmt::Debug for CurrentUserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentUserContext")
            .field("principal", &self.principal)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl CurrentUserContext {
    /// Create an uninitialised context for `principal`.
    pub fn new(principal: Option<UserId>, resolver: Arc<dyn PrincipalResolver>) -> Self {
        Self {
            principal,
            resolver,
            state: watch::Sender::new(ContextState::Uninitialized),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ContextPhase {
        self.state.borrow().phase()
    }

    /// Resolve the principal, or return the outcome of an earlier resolution.
    ///
    /// The first caller performs the resolution; concurrent callers wait for
    /// its outcome. Ready and Failed are terminal. If the resolving future is
    /// dropped before it completes the context becomes
    /// `Failed(ContextFailure::Cancelled)`.
    pub async fn initialize(&self) -> Result<UserSummary, ContextFailure> {
        let mut leader = false;
        self.state.send_if_modified(|state| {
            if matches!(state, ContextState::Uninitialized) {
                *state = ContextState::Initializing;
                leader = true;
                true
            } else {
                false
            }
        });

        if leader {
            self.resolve().await
        } else {
            self.await_outcome().await
        }
    }

    async fn resolve(&self) -> Result<UserSummary, ContextFailure> {
        let mut guard = CancelGuard::new(&self.state);
        let outcome = match self.principal.as_ref() {
            Some(principal) => self.resolver.resolve(principal).await,
            None => Err(ContextFailure::MissingPrincipal),
        };
        guard.disarm();

        let next = match &outcome {
            Ok(summary) => ContextState::Ready(summary.clone()),
            Err(failure) => ContextState::Failed(failure.clone()),
        };
        self.state.send_replace(next);
        outcome
    }

    async fn await_outcome(&self) -> Result<UserSummary, ContextFailure> {
        let mut rx = self.state.subscribe();
        let settled = match rx
            .wait_for(|state| !matches!(state, ContextState::Initializing))
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => return Err(ContextFailure::Cancelled),
        };
        match settled {
            ContextState::Ready(summary) => Ok(summary),
            ContextState::Failed(failure) => Err(failure),
            ContextState::Uninitialized | ContextState::Initializing => Err(
                ContextFailure::internal("context left initialisation without an outcome"),
            ),
        }
    }

    fn ready<T>(&self, project: impl FnOnce(&UserSummary) -> T) -> Result<T, ContextUninitialized> {
        let state = self.state.borrow();
        match &*state {
            ContextState::Ready(summary) => Ok(project(summary)),
            other => {
                let phase = other.phase();
                error!(%phase, "user context read before it was ready");
                Err(ContextUninitialized { state: phase })
            }
        }
    }

    /// Resolved user summary.
    pub fn summary(&self) -> Result<UserSummary, ContextUninitialized> {
        self.ready(UserSummary::clone)
    }

    /// Resolved user id.
    pub fn user_id(&self) -> Result<UserId, ContextUninitialized> {
        self.ready(|summary| summary.user_id().clone())
    }

    /// Resolved household; `None` for administrators.
    pub fn household_id(&self) -> Result<Option<HouseholdId>, ContextUninitialized> {
        self.ready(|summary| summary.household_id().copied())
    }

    /// Resolved roles.
    pub fn roles(&self) -> Result<BTreeSet<Role>, ContextUninitialized> {
        self.ready(|summary| summary.roles().clone())
    }

    /// Scope to hand to household-owned data access.
    pub fn scope(&self) -> Result<HouseholdScope, ContextUninitialized> {
        self.ready(HouseholdScope::for_summary)
    }

    /// `true` only when Ready and the resolved household is `None`.
    pub fn is_admin(&self) -> bool {
        matches!(&*self.state.borrow(), ContextState::Ready(summary) if summary.is_admin())
    }
}

/// Marks the context failed if the resolving future is dropped mid-flight.
struct CancelGuard<'a> {
    state: &'a watch::Sender<ContextState>,
    armed: bool,
}

impl<'a> CancelGuard<'a> {
    fn new(state: &'a watch::Sender<ContextState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("user context resolution dropped before completion");
            self.state
                .send_replace(ContextState::Failed(ContextFailure::Cancelled));
        }
    }
}

#[cfg(test)]
#[path = "user_context_tests.rs"]
mod tests;
