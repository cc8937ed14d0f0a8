// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use capplan::{
    FixedClock, LifecycleResult, SequentialIdSource, SubmissionDraft, submit,
};
use capplan_domain::{MetricsWeights, sample_roster};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_clock() -> FixedClock {
    FixedClock(datetime!(2026-05-04 10:00 UTC))
}

pub fn create_test_draft(team: &str, planning_date: Option<OffsetDateTime>) -> SubmissionDraft {
    SubmissionDraft::new(team.to_string(), String::from("lead-1"), planning_date)
}

/// Submits the sample roster and persists the resulting audit event.
pub fn submit_and_persist(
    persistence: &Persistence,
    ids: &SequentialIdSource,
    draft: SubmissionDraft,
) -> LifecycleResult {
    let result: LifecycleResult = submit(
        persistence,
        &sample_roster(),
        draft,
        MetricsWeights::default(),
        ids,
        &create_test_clock(),
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();
    result
}
