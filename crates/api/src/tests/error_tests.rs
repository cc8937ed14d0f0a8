// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use capplan::{CoreError, StoreError};
use capplan_domain::{DomainError, SubmissionId, SubmissionStatus};

use crate::{ApiError, RequestError, translate_core_error, translate_domain_error};

#[test]
fn test_invalid_transition_is_translated() {
    let err: ApiError = translate_core_error(CoreError::InvalidTransition {
        id: SubmissionId::new("SUB-1"),
        from: SubmissionStatus::Approved,
        to: SubmissionStatus::Rejected,
    });

    assert_eq!(
        err,
        ApiError::InvalidTransition {
            message: String::from("Submission SUB-1 is approved and cannot become rejected"),
        }
    );
}

#[test]
fn test_store_failures_become_internal_errors() {
    let err: ApiError =
        translate_core_error(CoreError::Store(StoreError::Backend(String::from("boom"))));
    assert!(matches!(err, ApiError::Internal { .. }));
}

#[test]
fn test_invalid_role_names_the_accepted_values() {
    let err: ApiError = translate_domain_error(DomainError::InvalidRole(String::from("Lead")));
    assert_eq!(
        err.to_string(),
        "Invalid input for field 'role': Invalid role: 'Lead'. Must be 'Coder', 'QA' or 'CoderQA'"
    );
}

#[test]
fn test_request_error_carries_field() {
    let err: ApiError = RequestError::Empty { field: "raised_by" }.into();
    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("raised_by"),
            message: String::from("raised_by cannot be empty"),
        }
    );
}
