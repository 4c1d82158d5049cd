//! In-memory failed-attempt tracker implementing [`LockoutPolicy`].
//!
//! Attempts for one [`AttemptSubject`] are counted when admitted, inside a
//! window of `lockout` length starting at the first attempt. Reaching the
//! threshold locks the subject until `lockout` has elapsed from the attempt
//! that tripped it. A success clears the subject's history; an abandoned
//! attempt is uncounted. Stale windows are pruned once the tracker grows past
//! a fixed number of subjects.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{AttemptAdmission, AttemptSubject, LockoutError, LockoutPolicy};

const DEFAULT_MAX_FAILED_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);
const DEFAULT_LOCKOUT_SECONDS: i64 = 900;

/// Tracked subjects above which stale windows are swept on each attempt.
const PRUNE_THRESHOLD: usize = 4096;

/// Thresholds for [`InMemoryLockoutPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutConfig {
    max_failed_attempts: NonZeroU32,
    lockout: Duration,
}

impl LockoutConfig {
    /// Lock after `max_failed_attempts` consecutive failures for `lockout`.
    pub fn new(max_failed_attempts: NonZeroU32, lockout: Duration) -> Self {
        Self {
            max_failed_attempts,
            lockout,
        }
    }

    /// Failures tolerated before locking.
    pub fn max_failed_attempts(&self) -> NonZeroU32 {
        self.max_failed_attempts
    }

    /// Lock duration, also the window failures are counted in.
    pub fn lockout(&self) -> Duration {
        self.lockout
    }
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FAILED_ATTEMPTS,
            Duration::seconds(DEFAULT_LOCKOUT_SECONDS),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    failures: u32,
    first_failure: DateTime<Utc>,
    locked_until: Option<DateTime<Utc>>,
}

impl AttemptWindow {
    fn opened_at(now: DateTime<Utc>) -> Self {
        Self {
            failures: 0,
            first_failure: now,
            locked_until: None,
        }
    }

    fn is_stale(&self, now: DateTime<Utc>, lockout: Duration) -> bool {
        match self.locked_until {
            Some(until) => now >= until,
            None => now - self.first_failure >= lockout,
        }
    }
}

/// Process-local lockout tracker.
pub struct InMemoryLockoutPolicy {
    config: LockoutConfig,
    clock: Arc<dyn Clock>,
    prune_threshold: usize,
    attempts: Mutex<HashMap<AttemptSubject, AttemptWindow>>,
}

impl InMemoryLockoutPolicy {
    /// Create a tracker using `clock` for all time reads.
    pub fn new(config: LockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            prune_threshold: PRUNE_THRESHOLD,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    fn attempts(&self) -> Result<MutexGuard<'_, HashMap<AttemptSubject, AttemptWindow>>, LockoutError> {
        self.attempts
            .lock()
            .map_err(|_| LockoutError::query("lockout state lock poisoned"))
    }
}

fn prune_stale(
    attempts: &mut HashMap<AttemptSubject, AttemptWindow>,
    now: DateTime<Utc>,
    lockout: Duration,
) {
    let before = attempts.len();
    attempts.retain(|_, window| !window.is_stale(now, lockout));
    debug!(
        pruned = before - attempts.len(),
        tracked = attempts.len(),
        "pruned stale sign-in windows"
    );
}

#[async_trait]
impl LockoutPolicy for InMemoryLockoutPolicy {
    async fn begin_attempt(
        &self,
        subject: &AttemptSubject,
    ) -> Result<AttemptAdmission, LockoutError> {
        let now = self.clock.utc();
        let lockout = self.config.lockout;
        let mut attempts = self.attempts()?;
        if attempts.len() >= self.prune_threshold {
            prune_stale(&mut attempts, now, lockout);
        }
        let window = attempts
            .entry(subject.clone())
            .or_insert_with(|| AttemptWindow::opened_at(now));
        if window.is_stale(now, lockout) {
            *window = AttemptWindow::opened_at(now);
        }
        if window.locked_until.is_some() {
            return Ok(AttemptAdmission::Locked);
        }
        window.failures = window.failures.saturating_add(1);
        if window.failures >= self.config.max_failed_attempts.get() {
            window.locked_until = Some(now + lockout);
            info!(%subject, failures = window.failures, "sign-in subject locked out");
        }
        Ok(AttemptAdmission::Admitted)
    }

    async fn record_success(&self, subject: &AttemptSubject) -> Result<(), LockoutError> {
        self.attempts()?.remove(subject);
        Ok(())
    }

    async fn abandon_attempt(&self, subject: &AttemptSubject) -> Result<(), LockoutError> {
        let mut attempts = self.attempts()?;
        let Some(window) = attempts.get_mut(subject) else {
            return Ok(());
        };
        window.failures = window.failures.saturating_sub(1);
        if window.failures == 0 {
            attempts.remove(subject);
        } else if window.failures < self.config.max_failed_attempts.get() {
            window.locked_until = None;
        }
        Ok(())
    }
}
