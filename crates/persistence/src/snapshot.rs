// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON snapshot format for the submission store.
//!
//! A snapshot carries every submission record in insertion order plus the
//! full audit log. Importing a snapshot checks the format version, that
//! submission ids are unique, that every record is internally consistent,
//! and that every audit event refers to a submission present in the same
//! snapshot.

use crate::error::PersistenceError;
use capplan_audit::AuditEvent;
use capplan_domain::{
    SubmissionId, SubmissionMetrics, SubmissionRecord, compute_metrics,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u32,
    /// Records in insertion order.
    pub submissions: Vec<SubmissionRecord>,
    /// Audit events in event-id order.
    #[serde(default)]
    pub audit_events: Vec<AuditEvent>,
}

impl StoreSnapshot {
    /// Creates a snapshot at the current format version.
    #[must_use]
    pub const fn new(submissions: Vec<SubmissionRecord>, audit_events: Vec<AuditEvent>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            submissions,
            audit_events,
        }
    }

    /// Parses a snapshot from JSON and checks it for consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the snapshot fails
    /// [`StoreSnapshot::verify`].
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.verify()?;
        Ok(snapshot)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the version, id uniqueness, record invariants and audit references.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn verify(&self) -> Result<(), PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedSnapshotVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut seen: BTreeSet<&SubmissionId> = BTreeSet::new();
        for record in &self.submissions {
            if !seen.insert(record.id()) {
                return Err(PersistenceError::DuplicateSubmission(
                    record.id().to_string(),
                ));
            }
            if let Some(reason) = record_inconsistency(record) {
                return Err(PersistenceError::InconsistentRecord {
                    submission_id: record.id().to_string(),
                    reason,
                });
            }
        }

        if let Some(orphan) = self
            .audit_events
            .iter()
            .find(|event| !seen.contains(&event.submission_id))
        {
            return Err(PersistenceError::OrphanedAuditEvent {
                submission_id: orphan.submission_id.to_string(),
            });
        }

        Ok(())
    }
}

/// Returns why a record breaks its invariants, if it does.
///
/// A record carries an admin approval exactly when it has been decided, and
/// its metrics are those of its roster. The productivity scores depend on
/// the deployment's coding weight, so only their internal sum is checked.
fn record_inconsistency(record: &SubmissionRecord) -> Option<&'static str> {
    if record.status().is_terminal() != record.admin_approval().is_some() {
        return Some(if record.status().is_terminal() {
            "decided without an admin approval"
        } else {
            "pending but carries an admin approval"
        });
    }

    let stored: &SubmissionMetrics = record.metrics();
    let expected: SubmissionMetrics = compute_metrics(record.team_members());
    let roster_totals_match: bool = stored.total_coding_tasks == expected.total_coding_tasks
        && stored.total_qa_capacity == expected.total_qa_capacity
        && stored.total_sampling_tasks == expected.total_sampling_tasks
        && stored.sampling_balance == expected.sampling_balance
        && stored.is_balanced == expected.is_balanced
        && stored.total_completed == expected.total_completed
        && stored.total_targets == expected.total_targets
        && stored.overall_performance == expected.overall_performance
        && stored.qa_productivity_score == expected.qa_productivity_score;
    let scores_add_up: bool = stored.total_productivity_score
        == stored
            .coder_productivity_score
            .saturating_add(stored.qa_productivity_score);

    (!roster_totals_match || !scores_add_up).then_some("metrics do not match the roster")
}
