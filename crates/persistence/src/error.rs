// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use capplan::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Reading or writing a snapshot file failed.
    IoError(String),
    /// The snapshot was written by an incompatible format version.
    UnsupportedSnapshotVersion { found: u32, expected: u32 },
    /// The snapshot contains the same submission id more than once.
    DuplicateSubmission(String),
    /// An audit event references a submission absent from the snapshot.
    OrphanedAuditEvent { submission_id: String },
    /// A submission record breaks a record invariant.
    InconsistentRecord {
        submission_id: String,
        reason: &'static str,
    },
    /// A lock guarding the store was poisoned by a panicking writer.
    LockPoisoned,
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::IoError(msg) => write!(f, "I/O error: {msg}"),
            Self::UnsupportedSnapshotVersion { found, expected } => write!(
                f,
                "Unsupported snapshot version {found} (expected {expected})"
            ),
            Self::DuplicateSubmission(id) => {
                write!(f, "Snapshot contains submission {id} more than once")
            }
            Self::OrphanedAuditEvent { submission_id } => write!(
                f,
                "Audit event references unknown submission {submission_id}"
            ),
            Self::InconsistentRecord {
                submission_id,
                reason,
            } => write!(f, "Submission {submission_id} is inconsistent: {reason}"),
            Self::LockPoisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Backend(err.to_string())
    }
}
