// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{MemberField, MemberId, Role};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not one of the known roles.
    InvalidRole(String),
    /// Field name is not a known team member field.
    InvalidField(String),
    /// Submission status string is not a known status.
    InvalidSubmissionStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A submission status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The field is not editable for the member's role.
    FieldNotEditable {
        /// The member being edited.
        member_id: MemberId,
        /// The field that was targeted.
        field: MemberField,
        /// The member's role at the time of the edit.
        role: Role,
    },
    /// No member with the given id exists in the roster.
    MemberNotFound(MemberId),
    /// Member name is empty.
    InvalidName(String),
    /// The roster already uses the largest member id.
    MemberIdsExhausted,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => {
                write!(
                    f,
                    "Invalid role: '{role}'. Must be 'Coder', 'QA' or 'CoderQA'"
                )
            }
            Self::InvalidField(field) => write!(f, "Invalid field: '{field}'"),
            Self::InvalidSubmissionStatus { status } => {
                write!(f, "Invalid submission status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition submission from {from} to {to}: {reason}")
            }
            Self::FieldNotEditable {
                member_id,
                field,
                role,
            } => {
                write!(
                    f,
                    "Field '{field}' is not editable for member {member_id} with role {role}"
                )
            }
            Self::MemberNotFound(member_id) => write!(f, "Member {member_id} not found"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::MemberIdsExhausted => write!(f, "No member ids left to allocate"),
        }
    }
}

impl std::error::Error for DomainError {}
