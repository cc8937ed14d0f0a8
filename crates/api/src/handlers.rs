// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler translates a request DTO into domain values, calls into the
//! core, persists whatever audit event the core produced, and translates the
//! outcome back into a response DTO or an [`ApiError`].

use std::str::FromStr;

use capplan::{
    Clock, CoreError, DateRange, IdSource, LifecycleResult, PlanningSession, SubmissionDraft,
    SubmissionFilter,
};
use capplan_audit::AuditEvent;
use capplan_domain::{
    EditBuffer, FieldErrors, FieldUpdate, MemberField, MemberId, MetricsWeights, Role,
    SubmissionId, SubmissionRecord, SubmissionStatus, TeamMember, compute_metrics_with,
    member_metrics, validate_member_name,
};
use capplan_persistence::Persistence;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::error::{ApiError, RequestError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddMemberRequest, ApplyRoleChangeRequest, ApplyRoleChangeResponse, AuditTimelineResponse,
    ComputeMetricsRequest, CreateSubmissionRequest, DecisionRequest, FieldValue,
    ListSubmissionsRequest, ListSubmissionsResponse, MemberEditResponse, MetricsResponse,
    RosterResponse, SubmissionResponse, SubmitSessionRequest, UpdateCompletedRequest,
    UpdateFieldRequest, UpdateRoleRequest, ValidateMemberRequest, ValidateMemberResponse,
};

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, RequestError> {
    value
        .map(|raw| {
            OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| RequestError::InvalidTimestamp {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    Role::from_str(raw).map_err(translate_domain_error)
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::Empty { field });
    }
    Ok(())
}

fn parse_field_update(request: UpdateFieldRequest) -> Result<FieldUpdate, ApiError> {
    let field: MemberField = MemberField::from_str(&request.field).map_err(translate_domain_error)?;
    match (field, request.value) {
        (MemberField::Name, FieldValue::Text(name)) => {
            validate_member_name(&name).map_err(translate_domain_error)?;
            Ok(FieldUpdate::Name(name.trim().to_string()))
        }
        (MemberField::Name, FieldValue::Number(_)) => Err(RequestError::WrongValueKind {
            field: field.to_string(),
            expected: "text",
        }
        .into()),
        (_, FieldValue::Number(value)) => {
            FieldUpdate::numeric(field, value).map_err(translate_domain_error)
        }
        (_, FieldValue::Text(_)) => Err(RequestError::WrongValueKind {
            field: field.to_string(),
            expected: "a number",
        }
        .into()),
    }
}

fn find_merged_member(
    session: &PlanningSession,
    member_id: MemberId,
) -> Result<TeamMember, ApiError> {
    session
        .merged_roster()
        .into_iter()
        .find(|m| m.id == member_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member {member_id} does not exist"),
        })
}

/// Persists the audit event of a lifecycle result and builds the response.
fn record_lifecycle_result(
    persistence: &Persistence,
    result: LifecycleResult,
    message: String,
) -> Result<SubmissionResponse, ApiError> {
    let event_id: i64 = persistence.persist_transition(&result)?;
    Ok(SubmissionResponse {
        submission: result.record,
        event_id,
        message,
    })
}

// ============================================================================
// Stateless operations
// ============================================================================

/// Computes aggregate and per-member metrics for a roster.
///
/// # Arguments
///
/// * `request` - The roster and an optional coding weight override
/// * `default_weights` - The deployment's weighting
#[must_use]
pub fn compute_metrics(
    request: &ComputeMetricsRequest,
    default_weights: MetricsWeights,
) -> MetricsResponse {
    let weights: MetricsWeights = request
        .coding_weight
        .map_or(default_weights, MetricsWeights::new);
    MetricsResponse {
        metrics: compute_metrics_with(&request.members, weights),
        member_metrics: member_metrics(&request.members),
    }
}

/// Validates one proposed member.
#[must_use]
pub fn validate_member(request: &ValidateMemberRequest) -> ValidateMemberResponse {
    let errors: FieldErrors = capplan_domain::validate_member(&request.member);
    ValidateMemberResponse {
        member_id: request.member.id,
        valid: errors.is_empty(),
        errors,
    }
}

/// Applies a role change, and its reset policy, to a set of buffered edits.
///
/// # Errors
///
/// Returns an error if the role is not recognised.
pub fn apply_role_change(
    request: ApplyRoleChangeRequest,
) -> Result<ApplyRoleChangeResponse, ApiError> {
    let role: Role = parse_role(&request.role)?;
    let edits: EditBuffer =
        capplan_domain::apply_role_change(request.edits, request.member_id, role);
    Ok(ApplyRoleChangeResponse { edits })
}

// ============================================================================
// Submissions
// ============================================================================

/// Creates a pending submission from a caller-provided roster.
///
/// # Errors
///
/// Returns an error if:
/// - The team name or submitter is empty
/// - The planning date is not RFC 3339
/// - Any member fails validation (nothing is stored)
pub fn create_submission(
    persistence: &Persistence,
    request: CreateSubmissionRequest,
    weights: MetricsWeights,
    ids: &dyn IdSource,
    clock: &dyn Clock,
) -> Result<SubmissionResponse, ApiError> {
    require_non_empty("team_name", &request.team_name)?;
    require_non_empty("raised_by", &request.raised_by)?;
    let planning_date: Option<OffsetDateTime> =
        parse_timestamp("planning_date", request.planning_date.as_deref())?;

    let draft: SubmissionDraft =
        SubmissionDraft::new(request.team_name, request.raised_by, planning_date);
    let result: LifecycleResult = capplan::submit(
        persistence,
        &request.members,
        draft,
        weights,
        ids,
        clock,
    )
    .map_err(|err| {
        warn!(error = %err, "Submission rejected");
        translate_core_error(err)
    })?;

    info!(submission_id = %result.record.id(), team = result.record.team_name(), "Submission created");
    let message: String = format!("Submission {} is pending review", result.record.id());
    record_lifecycle_result(persistence, result, message)
}

/// Approves a pending submission.
///
/// # Errors
///
/// Returns an error if the approver is empty, the submission does not exist,
/// or it has already been decided.
pub fn approve_submission(
    persistence: &Persistence,
    submission_id: &str,
    request: DecisionRequest,
    clock: &dyn Clock,
) -> Result<SubmissionResponse, ApiError> {
    require_non_empty("approver_id", &request.approver_id)?;
    let id: SubmissionId = SubmissionId::new(submission_id);
    let result: LifecycleResult = capplan::approve(
        persistence,
        &id,
        &request.approver_id,
        request.comments,
        clock,
    )
    .map_err(translate_core_error)?;

    info!(submission_id = %id, approver = %request.approver_id, "Submission approved");
    record_lifecycle_result(persistence, result, format!("Submission {id} approved"))
}

/// Rejects a pending submission.
///
/// # Errors
///
/// Same as [`approve_submission`].
pub fn reject_submission(
    persistence: &Persistence,
    submission_id: &str,
    request: DecisionRequest,
    clock: &dyn Clock,
) -> Result<SubmissionResponse, ApiError> {
    require_non_empty("approver_id", &request.approver_id)?;
    let id: SubmissionId = SubmissionId::new(submission_id);
    let result: LifecycleResult = capplan::reject(
        persistence,
        &id,
        &request.approver_id,
        request.comments,
        clock,
    )
    .map_err(translate_core_error)?;

    info!(submission_id = %id, approver = %request.approver_id, "Submission rejected");
    record_lifecycle_result(persistence, result, format!("Submission {id} rejected"))
}

/// Lists submissions, newest first.
///
/// This is a read-only operation.
///
/// # Errors
///
/// Returns an error if the status or a date bound cannot be parsed, or if
/// `from` is after `to`.
pub fn list_submissions(
    persistence: &Persistence,
    request: &ListSubmissionsRequest,
) -> Result<ListSubmissionsResponse, ApiError> {
    let status: Option<SubmissionStatus> = request
        .status
        .as_deref()
        .map(SubmissionStatus::from_str)
        .transpose()
        .map_err(translate_domain_error)?;
    let from: Option<OffsetDateTime> = parse_timestamp("from", request.from.as_deref())?;
    let to: Option<OffsetDateTime> = parse_timestamp("to", request.to.as_deref())?;
    if let Some((start, end)) = from.zip(to).filter(|(start, end)| start > end) {
        return Err(RequestError::InvertedDateRange {
            from: start.to_string(),
            to: end.to_string(),
        }
        .into());
    }

    let filter: SubmissionFilter = SubmissionFilter {
        status,
        team_name: request.team_name.clone(),
        date_range: (from.is_some() || to.is_some()).then_some(DateRange { from, to }),
    };
    let submissions: Vec<SubmissionRecord> =
        capplan::list_submissions(persistence, &filter).map_err(translate_core_error)?;

    debug!(count = submissions.len(), "Listed submissions");
    Ok(ListSubmissionsResponse {
        count: submissions.len(),
        submissions,
    })
}

/// Fetches one submission.
///
/// # Errors
///
/// Returns an error if the submission does not exist.
pub fn get_submission(
    persistence: &Persistence,
    submission_id: &str,
) -> Result<SubmissionRecord, ApiError> {
    capplan::get_submission(persistence, &SubmissionId::new(submission_id))
        .map_err(translate_core_error)
}

/// Returns the audit timeline of one submission, oldest first.
///
/// # Errors
///
/// Returns an error if the submission does not exist.
pub fn get_audit_timeline(
    persistence: &Persistence,
    submission_id: &str,
) -> Result<AuditTimelineResponse, ApiError> {
    let id: SubmissionId = SubmissionId::new(submission_id);
    capplan::get_submission(persistence, &id).map_err(translate_core_error)?;
    let events: Vec<AuditEvent> = persistence.get_audit_timeline(&id)?;
    Ok(AuditTimelineResponse {
        submission_id: id.to_string(),
        events,
    })
}

// ============================================================================
// Planning session
// ============================================================================

/// Describes the planning session: merged roster, metrics and edit state.
#[must_use]
pub fn get_roster(session: &PlanningSession) -> RosterResponse {
    RosterResponse {
        members: session.merged_roster(),
        member_metrics: session.member_metrics(),
        metrics: session.metrics(),
        editing: session.is_editing(),
        validation_errors: session.validation_errors().clone(),
    }
}

/// Enters edit mode. Pending edits are kept if already editing.
#[must_use]
pub fn enter_edit(session: &mut PlanningSession) -> RosterResponse {
    session.enter_edit();
    debug!("Entered edit mode");
    get_roster(session)
}

/// Discards pending edits and leaves edit mode.
#[must_use]
pub fn cancel_edit(session: &mut PlanningSession) -> RosterResponse {
    session.cancel_edit();
    debug!("Cancelled edit mode");
    get_roster(session)
}

/// Edits one planning field of a member.
///
/// # Errors
///
/// Returns an error if:
/// - The field or value is malformed
/// - The session is not in edit mode
/// - The member does not exist
/// - The field is not editable for the member's role
pub fn update_field(
    session: &mut PlanningSession,
    member_id: MemberId,
    request: UpdateFieldRequest,
) -> Result<MemberEditResponse, ApiError> {
    let update: FieldUpdate = parse_field_update(request)?;
    let errors: FieldErrors = session
        .update_field(member_id, update)
        .map_err(translate_core_error)?;
    Ok(MemberEditResponse {
        member: find_merged_member(session, member_id)?,
        errors,
    })
}

/// Changes a member's role, applying the reset policy.
///
/// # Errors
///
/// Returns an error if the role is unknown, the session is not in edit mode,
/// or the member does not exist.
pub fn update_role(
    session: &mut PlanningSession,
    member_id: MemberId,
    request: &UpdateRoleRequest,
) -> Result<MemberEditResponse, ApiError> {
    let role: Role = parse_role(&request.role)?;
    let errors: FieldErrors = session
        .update_role(member_id, role)
        .map_err(translate_core_error)?;
    Ok(MemberEditResponse {
        member: find_merged_member(session, member_id)?,
        errors,
    })
}

/// Records a member's completed count, outside the edit workflow.
///
/// # Errors
///
/// Returns an error if the member does not exist.
pub fn update_completed(
    session: &mut PlanningSession,
    member_id: MemberId,
    request: &UpdateCompletedRequest,
) -> Result<MemberEditResponse, ApiError> {
    let completed: u32 = session
        .update_completed(member_id, request.value)
        .map_err(translate_core_error)?;
    debug!(member_id = %member_id, completed, "Recorded completed count");
    Ok(MemberEditResponse {
        member: find_merged_member(session, member_id)?,
        errors: FieldErrors::new(),
    })
}

/// Saves pending edits to the roster.
///
/// # Errors
///
/// Returns an error if the session is not in edit mode or any buffered member
/// is invalid; in the latter case the session stays in edit mode.
pub fn save_draft(session: &mut PlanningSession) -> Result<RosterResponse, ApiError> {
    session.save_draft().map_err(translate_core_error)?;
    info!(members = session.roster().len(), "Saved roster draft");
    Ok(get_roster(session))
}

/// Submits the session's roster for review and saves pending edits.
///
/// # Arguments
///
/// * `session` - The planning session
/// * `persistence` - Where the submission and its audit event are stored
/// * `request` - Submitter, optional team override and planning date
/// * `default_team` - Team used when the request names none
/// * `ids` - Submission id allocator
/// * `clock` - Used when no planning date is given
///
/// # Errors
///
/// Returns an error if the submitter is empty, the planning date is malformed,
/// or any member is invalid.
pub fn submit_session(
    session: &mut PlanningSession,
    persistence: &Persistence,
    request: SubmitSessionRequest,
    default_team: &str,
    ids: &dyn IdSource,
    clock: &dyn Clock,
) -> Result<SubmissionResponse, ApiError> {
    require_non_empty("raised_by", &request.raised_by)?;
    let team_name: String = request
        .team_name
        .unwrap_or_else(|| default_team.to_string());
    require_non_empty("team_name", &team_name)?;
    let planning_date: Option<OffsetDateTime> =
        parse_timestamp("planning_date", request.planning_date.as_deref())?;

    let draft: SubmissionDraft = SubmissionDraft::new(team_name, request.raised_by, planning_date);
    let result: LifecycleResult = session
        .submit(persistence, draft, ids, clock)
        .map_err(|err: CoreError| {
            warn!(error = %err, "Session submission rejected");
            translate_core_error(err)
        })?;

    info!(submission_id = %result.record.id(), "Session roster submitted");
    let message: String = format!("Submission {} is pending review", result.record.id());
    record_lifecycle_result(persistence, result, message)
}

/// Adds a member to the roster.
///
/// # Errors
///
/// Returns an error if the name is empty or the role unknown.
pub fn add_member(
    session: &mut PlanningSession,
    request: &AddMemberRequest,
) -> Result<MemberEditResponse, ApiError> {
    let role: Role = parse_role(&request.role)?;
    let member_id: MemberId = session
        .add_member(&request.name, role)
        .map_err(translate_core_error)?;
    info!(member_id = %member_id, role = %role, "Added roster member");
    Ok(MemberEditResponse {
        member: find_merged_member(session, member_id)?,
        errors: FieldErrors::new(),
    })
}

/// Removes a member from the roster.
///
/// # Errors
///
/// Returns an error if the member does not exist.
pub fn remove_member(
    session: &mut PlanningSession,
    member_id: MemberId,
) -> Result<TeamMember, ApiError> {
    let removed: TeamMember = session
        .remove_member(member_id)
        .map_err(translate_core_error)?;
    info!(member_id = %member_id, "Removed roster member");
    Ok(removed)
}
