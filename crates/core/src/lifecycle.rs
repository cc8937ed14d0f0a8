// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission lifecycle: `Draft` (conceptual) → `Pending` → `Approved` | `Rejected`.
//!
//! Each successful operation returns the resulting record together with the
//! audit event describing the transition. Failed operations leave the store
//! untouched.

use crate::clock::{Clock, IdSource};
use crate::error::CoreError;
use crate::store::{StoreError, SubmissionStore};
use capplan_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use capplan_domain::{
    AdminApproval, MetricsWeights, RosterErrors, SubmissionId, SubmissionMetrics,
    SubmissionRecord, SubmissionStatus, TeamMember, compute_metrics_with, validate_all,
};
use time::OffsetDateTime;

/// The caller-provided part of a new submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    /// The submitting team.
    pub team_name: String,
    /// Who is raising the plan.
    pub raised_by: String,
    /// The planning instant. Defaults to the clock's current instant.
    pub planning_date: Option<OffsetDateTime>,
}

impl SubmissionDraft {
    #[must_use]
    pub const fn new(
        team_name: String,
        raised_by: String,
        planning_date: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            team_name,
            raised_by,
            planning_date,
        }
    }
}

/// The result of a successful lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleResult {
    /// The record after the operation.
    pub record: SubmissionRecord,
    /// The audit event recording this operation.
    pub audit_event: AuditEvent,
}

fn snapshot(record: &SubmissionRecord) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},members={}",
        record.status(),
        record.team_members().len()
    ))
}

/// Creates a pending submission from a roster.
///
/// # Arguments
///
/// * `store` - Where the new record is stored
/// * `roster` - The roster to snapshot, in display order
/// * `draft` - Team, submitter and optional planning date
/// * `weights` - Productivity score weighting
/// * `ids` - Allocator for the new record id
/// * `clock` - Used when `draft.planning_date` is absent
///
/// # Errors
///
/// Returns `CoreError::Validation` with every member's field errors if any
/// member is invalid; the store is not touched in that case. Store failures
/// are returned as `CoreError::Store`.
pub fn submit<S: SubmissionStore + ?Sized>(
    store: &S,
    roster: &[TeamMember],
    draft: SubmissionDraft,
    weights: MetricsWeights,
    ids: &dyn IdSource,
    clock: &dyn Clock,
) -> Result<LifecycleResult, CoreError> {
    let errors: RosterErrors = validate_all(roster);
    if !errors.is_empty() {
        return Err(CoreError::Validation(errors));
    }

    let metrics: SubmissionMetrics = compute_metrics_with(roster, weights);
    let id: SubmissionId = ids.next_id();
    let timestamp: OffsetDateTime = draft.planning_date.unwrap_or_else(|| clock.now());

    let record: SubmissionRecord = SubmissionRecord::new_pending(
        id.clone(),
        timestamp,
        draft.team_name,
        draft.raised_by,
        roster.to_vec(),
        metrics,
    );
    store.insert(record.clone())?;

    let action: Action = Action::new(
        String::from("SubmitPlan"),
        Some(format!(
            "Submitted plan for team '{}' with {} member(s)",
            record.team_name(),
            record.team_members().len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        Actor::submitter(record.raised_by()),
        Cause::new(id.value().to_string(), String::from("Plan submitted for review")),
        action,
        StateSnapshot::absent(),
        snapshot(&record),
        id,
    );

    Ok(LifecycleResult {
        record,
        audit_event,
    })
}

/// Approves a pending submission.
///
/// The metrics snapshot is never recomputed.
///
/// # Errors
///
/// Returns `CoreError::SubmissionNotFound` for unknown ids and
/// `CoreError::InvalidTransition` if the submission is not pending, including
/// when a concurrent decision wins the race.
pub fn approve<S: SubmissionStore + ?Sized>(
    store: &S,
    id: &SubmissionId,
    approver_id: &str,
    comments: Option<String>,
    clock: &dyn Clock,
) -> Result<LifecycleResult, CoreError> {
    decide(
        store,
        id,
        Decision::Approve,
        approver_id,
        comments,
        clock,
    )
}

/// Rejects a pending submission.
///
/// # Errors
///
/// Same as [`approve`].
pub fn reject<S: SubmissionStore + ?Sized>(
    store: &S,
    id: &SubmissionId,
    approver_id: &str,
    comments: Option<String>,
    clock: &dyn Clock,
) -> Result<LifecycleResult, CoreError> {
    decide(
        store,
        id,
        Decision::Reject,
        approver_id,
        comments,
        clock,
    )
}

/// An approver's verdict on a pending submission.
#[derive(Debug, Clone, Copy)]
enum Decision {
    Approve,
    Reject,
}

impl Decision {
    const fn status(self) -> SubmissionStatus {
        match self {
            Self::Approve => SubmissionStatus::Approved,
            Self::Reject => SubmissionStatus::Rejected,
        }
    }

    const fn action_name(self) -> &'static str {
        match self {
            Self::Approve => "ApproveSubmission",
            Self::Reject => "RejectSubmission",
        }
    }
}

fn decide<S: SubmissionStore + ?Sized>(
    store: &S,
    id: &SubmissionId,
    decision: Decision,
    approver_id: &str,
    comments: Option<String>,
    clock: &dyn Clock,
) -> Result<LifecycleResult, CoreError> {
    let target: SubmissionStatus = decision.status();
    let current: SubmissionRecord = store.get(id)?;

    if current.status().validate_transition(target).is_err() {
        return Err(CoreError::InvalidTransition {
            id: id.clone(),
            from: current.status(),
            to: target,
        });
    }

    let approval: AdminApproval =
        AdminApproval::new(approver_id.to_string(), clock.now(), comments.clone());

    // The status check above is advisory; the store's CAS is authoritative.
    let record: SubmissionRecord = store
        .transition(id, SubmissionStatus::Pending, target, approval)
        .map_err(|err| match err {
            StoreError::StatusConflict { actual, .. } => CoreError::InvalidTransition {
                id: id.clone(),
                from: actual,
                to: target,
            },
            other => CoreError::from(other),
        })?;

    let audit_event: AuditEvent = AuditEvent::new(
        Actor::approver(approver_id),
        Cause::new(
            id.value().to_string(),
            comments.unwrap_or_else(|| String::from("Review decision")),
        ),
        Action::new(
            decision.action_name().to_string(),
            Some(format!("Submission {id} marked {target}")),
        ),
        snapshot(&current),
        snapshot(&record),
        id.clone(),
    );

    Ok(LifecycleResult {
        record,
        audit_event,
    })
}
