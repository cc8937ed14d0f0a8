// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{FixedClock, SequentialIdSource, StoreError, SubmissionDraft, SubmissionFilter, SubmissionStore};
use capplan_domain::{AdminApproval, SubmissionId, SubmissionRecord, SubmissionStatus};
use std::sync::Mutex;
use time::OffsetDateTime;
use time::macros::datetime;

/// Minimal in-memory store used to drive the lifecycle in unit tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId(record.id().clone()));
        }
        records.push(record);
        Ok(())
    }

    fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn transition(
        &self,
        id: &SubmissionId,
        expected: SubmissionStatus,
        status: SubmissionStatus,
        approval: AdminApproval,
    ) -> Result<SubmissionRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record: &mut SubmissionRecord = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if record.status() != expected {
            return Err(StoreError::StatusConflict {
                id: id.clone(),
                expected,
                actual: record.status(),
            });
        }
        record
            .decide(status, approval)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(record.clone())
    }

    fn list(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut matching: Vec<SubmissionRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Ok(matching)
    }
}

pub const SUBMITTED_AT: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);
pub const DECIDED_AT: OffsetDateTime = datetime!(2026-03-03 14:30 UTC);

pub fn submit_clock() -> FixedClock {
    FixedClock(SUBMITTED_AT)
}

pub fn decide_clock() -> FixedClock {
    FixedClock(DECIDED_AT)
}

pub fn test_ids() -> SequentialIdSource {
    SequentialIdSource::new("SUB")
}

pub fn create_test_draft() -> SubmissionDraft {
    SubmissionDraft::new(String::from("Alpha"), String::from("lead-1"), None)
}
