// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod edits;
mod error;
mod metrics;
mod sample;
mod submission;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use edits::{EditBuffer, FieldUpdate, MemberEdits, apply_role_change};
pub use error::DomainError;
pub use metrics::{
    DEFAULT_CODING_WEIGHT, MemberMetrics, MetricsWeights, PerformanceTier, SubmissionMetrics,
    compute_metrics, compute_metrics_with, member_metrics, productivity_percent, sampling_percent,
};
pub use sample::sample_roster;
pub use submission::{AdminApproval, SubmissionId, SubmissionRecord, SubmissionStatus};
pub use types::{MemberField, MemberId, Role, TeamMember, clamp_units};
pub use validation::{
    FieldErrors, RosterErrors, validate_all, validate_member, validate_member_name,
};
