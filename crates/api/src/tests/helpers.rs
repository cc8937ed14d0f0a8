// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use capplan::{FixedClock, SequentialIdSource};
use capplan_domain::{MetricsWeights, sample_roster};
use capplan_persistence::Persistence;
use time::macros::datetime;

use crate::{CreateSubmissionRequest, DecisionRequest, SubmissionResponse, create_submission};

pub fn create_test_clock() -> FixedClock {
    FixedClock(datetime!(2026-06-01 08:00 UTC))
}

pub fn create_test_ids() -> SequentialIdSource {
    SequentialIdSource::new("SUB")
}

pub fn create_sample_request() -> CreateSubmissionRequest {
    CreateSubmissionRequest {
        team_name: String::from("Platform"),
        raised_by: String::from("lead-1"),
        members: sample_roster(),
        planning_date: None,
    }
}

pub fn create_admin_decision(comments: Option<&str>) -> DecisionRequest {
    DecisionRequest {
        approver_id: String::from("Admin User"),
        comments: comments.map(String::from),
    }
}

pub fn create_pending_submission(
    persistence: &Persistence,
    ids: &SequentialIdSource,
) -> SubmissionResponse {
    create_submission(
        persistence,
        create_sample_request(),
        MetricsWeights::default(),
        ids,
        &create_test_clock(),
    )
    .unwrap()
}
