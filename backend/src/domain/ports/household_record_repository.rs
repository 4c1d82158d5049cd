//! Port for household-owned record persistence.
//!
//! Every method takes the caller's [`HouseholdScope`] explicitly. Adapters
//! must filter reads and reject writes with it; a method that ignores the
//! scope for a non-administrator is a defect.

use async_trait::async_trait;

use crate::domain::{HouseholdRecord, HouseholdScope, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record repository adapters.
    pub enum RecordRepositoryError {
        /// Write targeted a household outside the caller's scope.
        OutOfScope => "record is outside the caller's household scope",
        /// Query or mutation failed during execution.
        Query { message: String } => "record repository query failed: {message}",
    }
}

/// Household-scoped data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HouseholdRecordRepository: Send + Sync {
    /// Records visible to `scope`.
    async fn list(&self, scope: &HouseholdScope)
    -> Result<Vec<HouseholdRecord>, RecordRepositoryError>;

    /// A single record, or `None` when missing or outside `scope`.
    async fn find(
        &self,
        scope: &HouseholdScope,
        id: &RecordId,
    ) -> Result<Option<HouseholdRecord>, RecordRepositoryError>;

    /// Store `record` if its household is within `scope` and any record it
    /// replaces is too.
    async fn insert(
        &self,
        scope: &HouseholdScope,
        record: HouseholdRecord,
    ) -> Result<(), RecordRepositoryError>;
}
