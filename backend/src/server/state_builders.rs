//! Builders wiring the in-memory adapters into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use hearth::domain::ports::{LockoutPolicy, NoLockoutPolicy};
use hearth::domain::{Authenticator, IdentityPrincipalResolver};
use hearth::inbound::http::state::HttpState;
use hearth::outbound::memory::{
    InMemoryIdentityStore, InMemoryLockoutPolicy, InMemoryRecordRepository, seed_demo,
};

use super::ServerConfig;

fn build_lockout(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn LockoutPolicy> {
    match config.lockout {
        Some(lockout) => Arc::new(InMemoryLockoutPolicy::new(lockout, clock)),
        None => {
            warn!("sign-in lockout disabled");
            Arc::new(NoLockoutPolicy)
        }
    }
}

/// Build handler state over fresh in-memory stores.
///
/// # Errors
/// Returns [`std::io::Error`] when demo seeding is enabled and fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let identities = Arc::new(InMemoryIdentityStore::new());
    if config.seed_demo {
        seed_demo(&identities, clock.as_ref())
            .map_err(|e| std::io::Error::other(format!("demo seeding failed: {e}")))?;
    }

    let login = Authenticator::new(
        identities.clone(),
        build_lockout(config, clock.clone()),
        identities.clone(),
    );
    Ok(HttpState::new(
        Arc::new(login),
        Arc::new(IdentityPrincipalResolver::new(identities)),
        Arc::new(InMemoryRecordRepository::new()),
        clock,
    ))
}
