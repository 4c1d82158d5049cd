//! In-memory [`HouseholdRecordRepository`] applying the caller's scope.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{HouseholdRecordRepository, RecordRepositoryError};
use crate::domain::{HouseholdOwned, HouseholdRecord, HouseholdScope, RecordId};

/// Records keyed by id, held in process memory.
#[derive(Default)]
pub struct InMemoryRecordRepository {
    records: RwLock<BTreeMap<RecordId, HouseholdRecord>>,
}

impl InMemoryRecordRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RecordRepositoryError {
    RecordRepositoryError::query("record store state poisoned")
}

#[async_trait]
impl HouseholdRecordRepository for InMemoryRecordRepository {
    async fn list(
        &self,
        scope: &HouseholdScope,
    ) -> Result<Vec<HouseholdRecord>, RecordRepositoryError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut visible = scope.filter(records.values().cloned());
        visible.sort_by_key(HouseholdRecord::created_at);
        Ok(visible)
    }

    async fn find(
        &self,
        scope: &HouseholdScope,
        id: &RecordId,
    ) -> Result<Option<HouseholdRecord>, RecordRepositoryError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .get(id)
            .filter(|record| scope.permits_record(*record))
            .cloned())
    }

    async fn insert(
        &self,
        scope: &HouseholdScope,
        record: HouseholdRecord,
    ) -> Result<(), RecordRepositoryError> {
        if scope.ensure_writable(record.household_id()).is_err() {
            warn!(record_id = %record.id(), "rejected write outside caller's household");
            return Err(RecordRepositoryError::out_of_scope());
        }
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records
            .get(record.id())
            .is_some_and(|existing| !scope.permits_record(existing))
        {
            warn!(record_id = %record.id(), "rejected overwrite of another household's record");
            return Err(RecordRepositoryError::out_of_scope());
        }
        records.insert(*record.id(), record);
        Ok(())
    }
}
