// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use capplan::PlanningSession;
use capplan_domain::{MemberField, MemberId, Role, SubmissionStatus, sample_roster};
use capplan_persistence::Persistence;

use super::helpers::{create_test_clock, create_test_ids};
use crate::{
    AddMemberRequest, ApiError, FieldValue, SubmitSessionRequest, UpdateCompletedRequest,
    UpdateFieldRequest, UpdateRoleRequest, add_member, cancel_edit, enter_edit, get_roster,
    remove_member, save_draft, submit_session, update_completed, update_field, update_role,
};

const JOHN: MemberId = MemberId::new(1);
const SUFIYAN: MemberId = MemberId::new(4);

fn numeric(field: &str, value: i64) -> UpdateFieldRequest {
    UpdateFieldRequest {
        field: field.to_string(),
        value: FieldValue::Number(value),
    }
}

#[test]
fn test_get_roster_reports_reference_metrics() {
    let session: PlanningSession = PlanningSession::new(sample_roster());

    let roster = get_roster(&session);

    assert!(!roster.editing);
    assert_eq!(roster.members.len(), 5);
    assert_eq!(roster.metrics.overall_performance, 117);
    assert_eq!(roster.member_metrics[0].productivity_percent, 113);
}

#[test]
fn test_update_field_requires_edit_mode() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());

    let result = update_field(&mut session, JOHN, numeric("coding", 9));

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "edit_mode_required"
    ));
}

#[test]
fn test_update_field_clamps_negative_values() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let response = update_field(&mut session, JOHN, numeric("sampling", -4)).unwrap();

    assert_eq!(response.member.sampling, 0);
    assert!(response.errors.is_empty());
}

#[test]
fn test_update_field_returns_validation_messages() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let response = update_field(&mut session, JOHN, numeric("target", 9)).unwrap();

    assert_eq!(
        response.errors[&MemberField::Target],
        "Target cannot exceed 8 (coding + QA capacity)"
    );
    assert!(get_roster(&session).validation_errors.contains_key(&JOHN));
}

#[test]
fn test_update_field_rejects_unknown_and_read_only_fields() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let unknown = update_field(&mut session, JOHN, numeric("velocity", 3));
    let completed = update_field(&mut session, JOHN, numeric("completed", 3));

    assert!(matches!(unknown, Err(ApiError::InvalidInput { .. })));
    assert!(matches!(completed, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_update_field_rejects_wrong_value_kind() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let result = update_field(
        &mut session,
        JOHN,
        UpdateFieldRequest {
            field: String::from("coding"),
            value: FieldValue::Text(String::from("eight")),
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "coding"
    ));
}

#[test]
fn test_update_field_not_editable_for_role() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let result = update_field(&mut session, SUFIYAN, numeric("sampling", 2));

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "role_editable_fields"
    ));
}

#[test]
fn test_update_role_applies_reset_policy() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let response = update_role(
        &mut session,
        JOHN,
        &UpdateRoleRequest {
            role: String::from("QA"),
        },
    )
    .unwrap();

    assert_eq!(response.member.role, Role::Qa);
    assert_eq!(response.member.coding, 0);
    assert_eq!(response.member.sampling, 0);
}

#[test]
fn test_update_role_rejects_unknown_role() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);

    let result = update_role(
        &mut session,
        JOHN,
        &UpdateRoleRequest {
            role: String::from("Manager"),
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));
}

#[test]
fn test_save_and_cancel_round_trip() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);
    update_field(&mut session, JOHN, numeric("coding", 9)).unwrap();
    let saved = save_draft(&mut session).unwrap();
    assert_eq!(saved.members[0].coding, 9);

    let _ = enter_edit(&mut session);
    update_field(&mut session, JOHN, numeric("coding", 1)).unwrap();
    let cancelled = cancel_edit(&mut session);

    assert!(!cancelled.editing);
    assert_eq!(cancelled.members[0].coding, 9);
}

#[test]
fn test_update_completed_outside_edit_mode() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());

    let response =
        update_completed(&mut session, JOHN, &UpdateCompletedRequest { value: 4 }).unwrap();

    assert_eq!(response.member.completed, 4);
    assert_eq!(get_roster(&session).member_metrics[0].productivity_percent, 50);
}

#[test]
fn test_add_and_remove_member() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());

    let added = add_member(
        &mut session,
        &AddMemberRequest {
            name: String::from("Priya"),
            role: String::from("CoderQA"),
        },
    )
    .unwrap();
    let removed = remove_member(&mut session, added.member.id).unwrap();

    assert_eq!(added.member.id, MemberId::new(6));
    assert_eq!(removed.name, "Priya");
    assert_eq!(get_roster(&session).members.len(), 5);
}

#[test]
fn test_remove_unknown_member_is_not_found() {
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let result = remove_member(&mut session, MemberId::new(77));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_submit_session_uses_default_team_and_persists_event() {
    let persistence: Persistence = Persistence::new_in_memory();
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);
    update_field(&mut session, JOHN, numeric("coding", 10)).unwrap();

    let response = submit_session(
        &mut session,
        &persistence,
        SubmitSessionRequest {
            team_name: None,
            raised_by: String::from("lead-1"),
            planning_date: None,
        },
        "Platform",
        &create_test_ids(),
        &create_test_clock(),
    )
    .unwrap();

    assert_eq!(response.submission.team_name(), "Platform");
    assert_eq!(response.submission.status(), SubmissionStatus::Pending);
    assert_eq!(response.submission.metrics().total_coding_tasks, 26);
    assert_eq!(response.event_id, 1);
    assert!(!get_roster(&session).editing);
}

#[test]
fn test_submit_session_with_invalid_edits_keeps_session_editing() {
    let persistence: Persistence = Persistence::new_in_memory();
    let mut session: PlanningSession = PlanningSession::new(sample_roster());
    let _ = enter_edit(&mut session);
    update_field(&mut session, JOHN, numeric("sampling", 12)).unwrap();

    let result = submit_session(
        &mut session,
        &persistence,
        SubmitSessionRequest {
            team_name: Some(String::from("Platform")),
            raised_by: String::from("lead-1"),
            planning_date: None,
        },
        "Platform",
        &create_test_ids(),
        &create_test_clock(),
    );

    assert!(matches!(result, Err(ApiError::ValidationFailed { .. })));
    assert!(get_roster(&session).editing);
    assert_eq!(persistence.submission_count().unwrap(), 0);
}
