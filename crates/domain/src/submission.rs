// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission records and approval status transitions.
//!
//! A submission is created once, as a snapshot of a roster plus its metrics.
//! Afterwards only the status and the approval metadata may change, and only
//! once: `Pending` moves to `Approved` or `Rejected`, both terminal.

use crate::error::DomainError;
use crate::metrics::SubmissionMetrics;
use crate::types::TeamMember;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Identifier of a submission record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a submission.
///
/// The conceptual `Draft` state is never persisted: a record exists only
/// from `Pending` onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Awaiting an approver's decision.
    Pending,
    /// Accepted by an approver.
    Approved,
    /// Turned down by an approver.
    Rejected,
}

impl SubmissionStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Checks if a transition from this status to `target` is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Approved
    /// - Pending → Rejected
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved | Self::Rejected)
        )
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("submission has already been decided"),
            });
        }
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("transition not permitted by review lifecycle rules"),
            });
        }
        Ok(())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidSubmissionStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who decided a submission, when, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminApproval {
    pub approved_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub approved_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl AdminApproval {
    #[must_use]
    pub const fn new(
        approved_by: String,
        approved_at: OffsetDateTime,
        comments: Option<String>,
    ) -> Self {
        Self {
            approved_by,
            approved_at,
            comments,
        }
    }
}

/// An immutable snapshot of a roster and its metrics, submitted for review.
///
/// Fields are private: once created, only [`SubmissionRecord::decide`] may
/// change the record, and it touches only `status` and `admin_approval`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    id: SubmissionId,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    team_name: String,
    raised_by: String,
    team_members: Vec<TeamMember>,
    metrics: SubmissionMetrics,
    status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_approval: Option<AdminApproval>,
}

impl SubmissionRecord {
    /// Creates a new pending submission.
    ///
    /// # Arguments
    ///
    /// * `id` - The allocated submission id
    /// * `timestamp` - The planning instant the submission refers to
    /// * `team_name` - The submitting team
    /// * `raised_by` - Who submitted the plan
    /// * `team_members` - The roster snapshot, in roster order
    /// * `metrics` - Metrics computed from `team_members`
    #[must_use]
    pub const fn new_pending(
        id: SubmissionId,
        timestamp: OffsetDateTime,
        team_name: String,
        raised_by: String,
        team_members: Vec<TeamMember>,
        metrics: SubmissionMetrics,
    ) -> Self {
        Self {
            id,
            timestamp,
            team_name,
            raised_by,
            team_members,
            metrics,
            status: SubmissionStatus::Pending,
            admin_approval: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &SubmissionId {
        &self.id
    }

    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    #[must_use]
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    #[must_use]
    pub fn raised_by(&self) -> &str {
        &self.raised_by
    }

    #[must_use]
    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    #[must_use]
    pub const fn metrics(&self) -> &SubmissionMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn status(&self) -> SubmissionStatus {
        self.status
    }

    #[must_use]
    pub const fn admin_approval(&self) -> Option<&AdminApproval> {
        self.admin_approval.as_ref()
    }

    /// Records an approver's decision.
    ///
    /// The record is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the record is
    /// pending and `status` is terminal.
    pub fn decide(
        &mut self,
        status: SubmissionStatus,
        approval: AdminApproval,
    ) -> Result<(), DomainError> {
        self.status.validate_transition(status)?;
        self.status = status;
        self.admin_approval = Some(approval);
        Ok(())
    }
}
