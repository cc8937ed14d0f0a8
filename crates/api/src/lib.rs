// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Capacity Planner.
//!
//! Handlers accept plain request DTOs, never leak core or domain errors, and
//! persist the audit event of every lifecycle transition they perform.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, RequestError, translate_core_error, translate_domain_error};
pub use handlers::{
    add_member, apply_role_change, approve_submission, cancel_edit, compute_metrics,
    create_submission, enter_edit, get_audit_timeline, get_roster, get_submission,
    list_submissions, reject_submission, remove_member, save_draft, submit_session,
    update_completed, update_field, update_role, validate_member,
};
pub use request_response::{
    AddMemberRequest, ApplyRoleChangeRequest, ApplyRoleChangeResponse, AuditTimelineResponse,
    ComputeMetricsRequest, CreateSubmissionRequest, DecisionRequest, FieldValue,
    ListSubmissionsRequest, ListSubmissionsResponse, MemberEditResponse, MetricsResponse,
    RosterResponse, SubmissionResponse, SubmitSessionRequest, UpdateCompletedRequest,
    UpdateFieldRequest, UpdateRoleRequest, ValidateMemberRequest, ValidateMemberResponse,
};
