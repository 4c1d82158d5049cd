//! Household scoping value handed to every data-access call.
//!
//! A [`HouseholdScope`] can only be obtained from a Ready
//! [`CurrentUserContext`](super::CurrentUserContext), so holding one proves
//! the caller's identity was resolved. Collaborators take it as an explicit
//! parameter and must apply it to every read and write.

use thiserror::Error;

use super::{HouseholdId, HouseholdOwned, UserSummary};

/// Raised when a write targets a household outside the caller's scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeViolation {
    /// Target household differs from the caller's own.
    #[error("household is outside the caller's scope")]
    OutsideHousehold,
    /// Unscoped callers must say which household a write lands in.
    #[error("a target household is required for unscoped callers")]
    TargetHouseholdRequired,
}

/// Scoping authority derived from a resolved identity.
///
/// `None` means administrator; [`HouseholdScope::is_admin`] is derived from
/// it and never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdScope {
    household_id: Option<HouseholdId>,
}

impl HouseholdScope {
    pub(crate) fn for_summary(summary: &UserSummary) -> Self {
        Self {
            household_id: summary.household_id().copied(),
        }
    }

    /// Household the caller is confined to; `None` for administrators.
    pub fn household_id(&self) -> Option<&HouseholdId> {
        self.household_id.as_ref()
    }

    /// Whether the caller is exempt from household filtering.
    pub fn is_admin(&self) -> bool {
        self.household_id.is_none()
    }

    /// Whether data belonging to `household` is visible to the caller.
    pub fn permits(&self, household: &HouseholdId) -> bool {
        self.household_id
            .as_ref()
            .is_none_or(|own| own == household)
    }

    /// Whether `record` is visible to the caller.
    pub fn permits_record<T: HouseholdOwned + ?Sized>(&self, record: &T) -> bool {
        self.permits(record.household_id())
    }

    /// Keep only the records visible to the caller.
    pub fn filter<T, I>(&self, records: I) -> Vec<T>
    where
        T: HouseholdOwned,
        I: IntoIterator<Item = T>,
    {
        records
            .into_iter()
            .filter(|record| self.permits_record(record))
            .collect()
    }

    /// Reject writes aimed at a household outside the caller's scope.
    pub fn ensure_writable(&self, household: &HouseholdId) -> Result<(), ScopeViolation> {
        if self.permits(household) {
            Ok(())
        } else {
            Err(ScopeViolation::OutsideHousehold)
        }
    }

    /// Decide which household a new record lands in.
    ///
    /// Scoped callers always write to their own household; naming another is
    /// a violation. Administrators must name the target explicitly.
    pub fn target_household(
        &self,
        requested: Option<HouseholdId>,
    ) -> Result<HouseholdId, ScopeViolation> {
        match (self.household_id, requested) {
            (Some(own), None) => Ok(own),
            (Some(own), Some(requested)) if own == requested => Ok(own),
            (Some(_), Some(_)) => Err(ScopeViolation::OutsideHousehold),
            (None, Some(requested)) => Ok(requested),
            (None, None) => Err(ScopeViolation::TargetHouseholdRequired),
        }
    }
}
