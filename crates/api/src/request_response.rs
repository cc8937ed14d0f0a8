// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use capplan_audit::AuditEvent;
use capplan_domain::{
    EditBuffer, FieldErrors, MemberId, MemberMetrics, RosterErrors, SubmissionMetrics,
    SubmissionRecord, TeamMember,
};
use serde::{Deserialize, Serialize};

/// API request to compute metrics for an arbitrary roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeMetricsRequest {
    pub members: Vec<TeamMember>,
    /// Overrides the deployment's coding weight for this call.
    #[serde(default)]
    pub coding_weight: Option<u32>,
}

/// API response carrying aggregate and per-member metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub metrics: SubmissionMetrics,
    /// Per-member values, in roster order.
    pub member_metrics: Vec<MemberMetrics>,
}

/// API request to validate one proposed member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMemberRequest {
    /// The merged, proposed member values.
    pub member: TeamMember,
}

/// API response for a single-member validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMemberResponse {
    pub member_id: MemberId,
    pub valid: bool,
    pub errors: FieldErrors,
}

/// API request to apply a role change to a set of buffered edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRoleChangeRequest {
    #[serde(default)]
    pub edits: EditBuffer,
    pub member_id: MemberId,
    /// `Coder`, `QA` or `CoderQA`.
    pub role: String,
}

/// API response carrying the updated edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRoleChangeResponse {
    pub edits: EditBuffer,
}

/// API request to create a submission from a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub team_name: String,
    pub raised_by: String,
    pub members: Vec<TeamMember>,
    /// RFC 3339 planning instant. Defaults to now.
    #[serde(default)]
    pub planning_date: Option<String>,
}

/// API request to submit the planning session's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSessionRequest {
    /// Defaults to the deployment's configured team.
    #[serde(default)]
    pub team_name: Option<String>,
    pub raised_by: String,
    /// RFC 3339 planning instant. Defaults to now.
    #[serde(default)]
    pub planning_date: Option<String>,
}

/// API request to approve or reject a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub approver_id: String,
    #[serde(default)]
    pub comments: Option<String>,
}

/// API response for any operation that creates or decides a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission: SubmissionRecord,
    /// The id of the audit event recorded for this operation.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to list submissions. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsRequest {
    /// `pending`, `approved` or `rejected`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    /// Inclusive RFC 3339 lower bound.
    #[serde(default)]
    pub from: Option<String>,
    /// Inclusive RFC 3339 upper bound.
    #[serde(default)]
    pub to: Option<String>,
}

/// API response for listing submissions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsResponse {
    pub submissions: Vec<SubmissionRecord>,
    pub count: usize,
}

/// API response for the audit timeline of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTimelineResponse {
    pub submission_id: String,
    /// Events, oldest first.
    pub events: Vec<AuditEvent>,
}

/// API response describing the planning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    /// Merged roster (persisted values with buffered edits overlaid).
    pub members: Vec<TeamMember>,
    pub member_metrics: Vec<MemberMetrics>,
    pub metrics: SubmissionMetrics,
    pub editing: bool,
    pub validation_errors: RosterErrors,
}

/// A raw field value: a count for capacity fields, text for `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

/// API request to edit one field of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldRequest {
    /// `name`, `coding`, `qa`, `sampling` or `target`.
    pub field: String,
    pub value: FieldValue,
}

/// API request to change a member's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// API request to record a member's completed count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompletedRequest {
    /// Negative values are clamped to zero.
    pub value: i64,
}

/// API response after an edit, with the member's current field errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEditResponse {
    pub member: TeamMember,
    pub errors: FieldErrors,
}

/// API request to add a member to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub name: String,
    pub role: String,
}
