// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use capplan::CoreError;
use capplan_domain::{DomainError, RosterErrors};
use capplan_persistence::PersistenceError;
use thiserror::Error;

/// Errors raised while parsing raw request values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A timestamp was not valid RFC 3339.
    #[error("'{value}' is not an RFC 3339 timestamp")]
    InvalidTimestamp { field: &'static str, value: String },

    /// A date range whose start is after its end.
    #[error("Date range start {from} is after end {to}")]
    InvertedDateRange { from: String, to: String },

    /// A field value of the wrong kind (text for a count, or the reverse).
    #[error("Field '{field}' expects {expected}")]
    WrongValueKind { field: String, expected: &'static str },

    /// A required value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

impl RequestError {
    /// The request field the error refers to.
    #[must_use]
    pub fn field(&self) -> String {
        match self {
            Self::InvalidTimestamp { field, .. } | Self::Empty { field } => (*field).to_string(),
            Self::InvertedDateRange { .. } => String::from("date_range"),
            Self::WrongValueKind { field, .. } => field.clone(),
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// One or more members failed field validation.
    ValidationFailed {
        /// Field errors keyed by member.
        errors: RosterErrors,
    },
    /// Approve or reject on a submission that is no longer pending.
    InvalidTransition {
        /// A human-readable description of the rejected transition.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed { errors } => {
                write!(f, "Validation failed for {} member(s)", errors.len())
            }
            Self::InvalidTransition { message } => write!(f, "Invalid transition: {message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::InvalidInput {
            field: err.field(),
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(role) => ApiError::InvalidInput {
            field: String::from("role"),
            message: DomainError::InvalidRole(role).to_string(),
        },
        DomainError::InvalidField(field) => ApiError::InvalidInput {
            field: String::from("field"),
            message: format!("Unknown or read-only field '{field}'"),
        },
        DomainError::InvalidSubmissionStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown submission status '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::InvalidTransition {
            message: format!("Cannot move from {from} to {to}: {reason}"),
        },
        err @ DomainError::FieldNotEditable { .. } => ApiError::DomainRuleViolation {
            rule: String::from("role_editable_fields"),
            message: err.to_string(),
        },
        DomainError::MemberNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member {id} does not exist"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        err @ DomainError::MemberIdsExhausted => ApiError::DomainRuleViolation {
            rule: String::from("member_id_capacity"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Validation(errors) => ApiError::ValidationFailed { errors },
        CoreError::InvalidTransition { id, from, to } => ApiError::InvalidTransition {
            message: format!("Submission {id} is {from} and cannot become {to}"),
        },
        CoreError::SubmissionNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Submission"),
            message: format!("Submission {id} does not exist"),
        },
        CoreError::NotInEditMode => ApiError::DomainRuleViolation {
            rule: String::from("edit_mode_required"),
            message: String::from("Enter edit mode before changing or saving planning fields"),
        },
        CoreError::Store(store_err) => ApiError::Internal {
            message: store_err.to_string(),
        },
    }
}
