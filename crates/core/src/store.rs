// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The repository seam for submission records.
//!
//! Implementations must make [`SubmissionStore::transition`] a
//! compare-and-swap on the record's status: when two callers race to decide
//! the same pending record, exactly one succeeds and the other receives
//! [`StoreError::StatusConflict`].

use capplan_domain::{AdminApproval, SubmissionId, SubmissionRecord, SubmissionStatus};
use time::OffsetDateTime;

/// Errors reported by a submission store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id exists.
    NotFound(SubmissionId),
    /// The record's status did not match the expected status.
    StatusConflict {
        /// The record.
        id: SubmissionId,
        /// The status the caller expected.
        expected: SubmissionStatus,
        /// The status the record actually had.
        actual: SubmissionStatus,
    },
    /// A record with this id already exists.
    DuplicateId(SubmissionId),
    /// The backing storage failed.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Submission {id} not found"),
            Self::StatusConflict {
                id,
                expected,
                actual,
            } => write!(
                f,
                "Submission {id} is {actual}, expected {expected}"
            ),
            Self::DuplicateId(id) => write!(f, "Submission {id} already exists"),
            Self::Backend(msg) => write!(f, "Store backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Inclusive bounds on a submission timestamp. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.from.is_none_or(|from| instant >= from) && self.to.is_none_or(|to| instant <= to)
    }
}

/// Read-only query over stored submissions. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    /// Matched case-insensitively against the whole team name.
    pub team_name: Option<String>,
    pub date_range: Option<DateRange>,
}

impl SubmissionFilter {
    /// Returns true if `record` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        self.status.is_none_or(|status| record.status() == status)
            && self
                .team_name
                .as_deref()
                .is_none_or(|team| record.team_name().to_lowercase() == team.to_lowercase())
            && self
                .date_range
                .is_none_or(|range| range.contains(record.timestamp()))
    }
}

/// Repository of submission records.
pub trait SubmissionStore: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id is already taken.
    fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError>;

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record has this id.
    fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError>;

    /// Atomically moves a record from `expected` to `status`, attaching `approval`.
    ///
    /// Nothing is written unless the record's current status equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown ids and
    /// `StoreError::StatusConflict` when the current status differs.
    fn transition(
        &self,
        id: &SubmissionId,
        expected: SubmissionStatus,
        status: SubmissionStatus,
        approval: AdminApproval,
    ) -> Result<SubmissionRecord, StoreError>;

    /// Lists records matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the storage cannot be read.
    fn list(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionRecord>, StoreError>;
}
