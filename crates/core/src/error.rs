// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::StoreError;
use capplan_domain::{DomainError, RosterErrors, SubmissionId, SubmissionStatus};

/// Errors that can occur during planning and lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// One or more members failed field validation. Nothing was mutated.
    Validation(RosterErrors),
    /// Approve or reject was attempted on a submission that is not pending.
    InvalidTransition {
        /// The submission.
        id: SubmissionId,
        /// The status the submission was found in.
        from: SubmissionStatus,
        /// The status that was requested.
        to: SubmissionStatus,
    },
    /// No submission with the given id exists.
    SubmissionNotFound(SubmissionId),
    /// The operation requires the session to be in edit mode.
    NotInEditMode,
    /// The submission store failed.
    Store(StoreError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Validation(errors) => {
                let fields: usize = errors.values().map(std::collections::BTreeMap::len).sum();
                write!(
                    f,
                    "Validation failed: {fields} field error(s) across {} member(s)",
                    errors.len()
                )
            }
            Self::InvalidTransition { id, from, to } => {
                write!(f, "Submission {id} cannot move from {from} to {to}")
            }
            Self::SubmissionNotFound(id) => write!(f, "Submission {id} not found"),
            Self::NotInEditMode => write!(f, "Planning session is not in edit mode"),
            Self::Store(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::SubmissionNotFound(id),
            other => Self::Store(other),
        }
    }
}
