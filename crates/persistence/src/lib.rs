// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Capacity Planner.
//!
//! This crate provides the in-memory submission store and the audit log.
//! Durable storage is out of scope; the whole store can instead be exported
//! to and imported from a JSON snapshot.
//!
//! ## Concurrency
//!
//! All state sits behind a single `RwLock`. Status transitions check the
//! expected status and write the decision under one write-lock acquisition,
//! so two approvers racing on the same pending submission cannot both win.
//!
//! ## Testing Philosophy
//!
//! - Every test builds its own store with `Persistence::new_in_memory()`
//! - Concurrency is exercised with `std::thread::scope` against a shared store
//! - Snapshot files are written under the system temp directory only

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use snapshot::{SNAPSHOT_VERSION, StoreSnapshot};

use capplan::{LifecycleResult, StoreError, SubmissionFilter, SubmissionStore};
use capplan_audit::AuditEvent;
use capplan_domain::{AdminApproval, SubmissionId, SubmissionRecord, SubmissionStatus};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct StoreState {
    /// Records in insertion order.
    records: Vec<SubmissionRecord>,
    /// Audit events in event-id order.
    audit_log: Vec<AuditEvent>,
    next_event_id: i64,
}

impl StoreState {
    fn position(&self, id: &SubmissionId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

/// In-memory persistence adapter for submission records and audit events.
#[derive(Debug)]
pub struct Persistence {
    state: RwLock<StoreState>,
}

impl Persistence {
    /// Creates an empty store.
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_event_id: 1,
                ..StoreState::default()
            }),
        }
    }

    /// Creates a store pre-populated from a snapshot.
    ///
    /// Audit events without an id are assigned fresh ones; the next id issued
    /// follows the largest id in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot fails verification.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, PersistenceError> {
        snapshot.verify()?;

        let mut next_event_id: i64 = snapshot
            .audit_events
            .iter()
            .filter_map(|event| event.event_id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let audit_log: Vec<AuditEvent> = snapshot
            .audit_events
            .into_iter()
            .map(|event| {
                if event.event_id.is_some() {
                    event
                } else {
                    let id: i64 = next_event_id;
                    next_event_id = next_event_id.saturating_add(1);
                    event.with_event_id(id)
                }
            })
            .collect();

        info!(
            submissions = snapshot.submissions.len(),
            audit_events = audit_log.len(),
            "Loaded store snapshot"
        );

        Ok(Self {
            state: RwLock::new(StoreState {
                records: snapshot.submissions,
                audit_log,
                next_event_id,
            }),
        })
    }

    /// Creates a store from a JSON snapshot file.
    ///
    /// # Arguments
    ///
    /// * `path` - The snapshot file to read
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or verified.
    pub fn load_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let json: String = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bytes = json.len(), "Read snapshot file");
        Self::from_snapshot(StoreSnapshot::from_json(&json)?)
    }

    /// Captures the current contents of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn export_snapshot(&self) -> Result<StoreSnapshot, PersistenceError> {
        let state: RwLockReadGuard<'_, StoreState> = self.read()?;
        Ok(StoreSnapshot::new(
            state.records.clone(),
            state.audit_log.clone(),
        ))
    }

    /// Writes the current contents of the store to a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_snapshot_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let json: String = self.export_snapshot()?.to_json()?;
        std::fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "Wrote store snapshot");
        Ok(())
    }

    /// Persists an audit event and returns its assigned id.
    ///
    /// Event ids are strictly increasing in persistence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn persist_audit_event(&self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        let mut state: RwLockWriteGuard<'_, StoreState> = self.write()?;
        let event_id: i64 = state.next_event_id;
        state.next_event_id = event_id.saturating_add(1);
        state.audit_log.push(event.clone().with_event_id(event_id));
        debug!(
            event_id,
            action = %event.action.name,
            submission_id = %event.submission_id,
            "Persisted audit event"
        );
        Ok(event_id)
    }

    /// Persists the audit event of a lifecycle result.
    ///
    /// The record itself was already written through [`SubmissionStore`].
    ///
    /// # Returns
    ///
    /// The assigned audit event id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn persist_transition(&self, result: &LifecycleResult) -> Result<i64, PersistenceError> {
        self.persist_audit_event(&result.audit_event)
    }

    /// Returns the audit events of one submission, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn get_audit_timeline(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        let state: RwLockReadGuard<'_, StoreState> = self.read()?;
        Ok(state
            .audit_log
            .iter()
            .filter(|event| &event.submission_id == submission_id)
            .cloned()
            .collect())
    }

    /// Returns the number of stored submissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn submission_count(&self) -> Result<usize, PersistenceError> {
        Ok(self.read()?.records.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, PersistenceError> {
        self.state.read().map_err(|_| PersistenceError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, PersistenceError> {
        self.state.write().map_err(|_| PersistenceError::LockPoisoned)
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl SubmissionStore for Persistence {
    fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        let mut state: RwLockWriteGuard<'_, StoreState> = self.write()?;
        if state.position(record.id()).is_some() {
            warn!(submission_id = %record.id(), "Rejected duplicate submission id");
            return Err(StoreError::DuplicateId(record.id().clone()));
        }
        info!(
            submission_id = %record.id(),
            team = record.team_name(),
            members = record.team_members().len(),
            "Stored submission"
        );
        state.records.push(record);
        Ok(())
    }

    fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError> {
        let state: RwLockReadGuard<'_, StoreState> = self.read()?;
        state
            .position(id)
            .map(|index| state.records[index].clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn transition(
        &self,
        id: &SubmissionId,
        expected: SubmissionStatus,
        status: SubmissionStatus,
        approval: AdminApproval,
    ) -> Result<SubmissionRecord, StoreError> {
        let mut state: RwLockWriteGuard<'_, StoreState> = self.write()?;
        let index: usize = state
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let record: &mut SubmissionRecord = &mut state.records[index];

        if record.status() != expected {
            debug!(
                submission_id = %id,
                expected = %expected,
                actual = %record.status(),
                "Status compare-and-swap failed"
            );
            return Err(StoreError::StatusConflict {
                id: id.clone(),
                expected,
                actual: record.status(),
            });
        }

        let from: SubmissionStatus = record.status();
        record
            .decide(status, approval)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        info!(submission_id = %id, from = %from, to = %status, "Submission decided");
        Ok(record.clone())
    }

    fn list(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionRecord>, StoreError> {
        let state: RwLockReadGuard<'_, StoreState> = self.read()?;
        // Walk newest-inserted first so the stable sort breaks timestamp ties
        // in favour of later submissions.
        let mut matching: Vec<SubmissionRecord> = state
            .records
            .iter()
            .rev()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Ok(matching)
    }
}
