// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for submission filters and store error mapping.

use crate::{CoreError, DateRange, StoreError, SubmissionFilter};
use capplan_domain::{
    MetricsWeights, SubmissionId, SubmissionRecord, SubmissionStatus, compute_metrics,
    sample_roster,
};
use time::OffsetDateTime;
use time::macros::datetime;

fn record_at(team: &str, timestamp: OffsetDateTime) -> SubmissionRecord {
    let roster = sample_roster();
    SubmissionRecord::new_pending(
        SubmissionId::new("SUB-1"),
        timestamp,
        team.to_string(),
        String::from("lead-1"),
        roster.clone(),
        compute_metrics(&roster),
    )
}

#[test]
fn test_empty_filter_matches_everything() {
    let record = record_at("Alpha", datetime!(2026-03-01 00:00 UTC));
    assert!(SubmissionFilter::default().matches(&record));
}

#[test]
fn test_team_filter_is_case_insensitive_exact_match() {
    let record = record_at("Alpha", datetime!(2026-03-01 00:00 UTC));

    let lower = SubmissionFilter {
        team_name: Some(String::from("alpha")),
        ..SubmissionFilter::default()
    };
    let partial = SubmissionFilter {
        team_name: Some(String::from("Alp")),
        ..SubmissionFilter::default()
    };

    assert!(lower.matches(&record));
    assert!(!partial.matches(&record));
}

#[test]
fn test_team_filter_folds_non_ascii_case() {
    let record = record_at("Équipe Nord", datetime!(2026-03-01 00:00 UTC));

    let filter = SubmissionFilter {
        team_name: Some(String::from("équipe nord")),
        ..SubmissionFilter::default()
    };

    assert!(filter.matches(&record));
}

#[test]
fn test_date_range_bounds_are_inclusive() {
    let range: DateRange = DateRange {
        from: Some(datetime!(2026-03-01 00:00 UTC)),
        to: Some(datetime!(2026-03-31 23:59 UTC)),
    };

    assert!(range.contains(datetime!(2026-03-01 00:00 UTC)));
    assert!(range.contains(datetime!(2026-03-31 23:59 UTC)));
    assert!(!range.contains(datetime!(2026-02-28 23:59 UTC)));
    assert!(!range.contains(datetime!(2026-04-01 00:00 UTC)));
}

#[test]
fn test_open_date_range_bound() {
    let range: DateRange = DateRange {
        from: None,
        to: Some(datetime!(2026-03-01 00:00 UTC)),
    };
    assert!(range.contains(datetime!(1999-01-01 00:00 UTC)));
}

#[test]
fn test_status_filter_excludes_other_statuses() {
    let record = record_at("Alpha", datetime!(2026-03-01 00:00 UTC));
    let filter = SubmissionFilter {
        status: Some(SubmissionStatus::Approved),
        ..SubmissionFilter::default()
    };
    assert!(!filter.matches(&record));
}

#[test]
fn test_store_not_found_maps_to_submission_not_found() {
    let id: SubmissionId = SubmissionId::new("SUB-9");
    assert_eq!(
        CoreError::from(StoreError::NotFound(id.clone())),
        CoreError::SubmissionNotFound(id)
    );
}

#[test]
fn test_store_backend_error_is_wrapped() {
    let err: CoreError = CoreError::from(StoreError::Backend(String::from("disk full")));
    assert_eq!(err.to_string(), "Store error: Store backend error: disk full");
}

#[test]
fn test_default_weights_match_reference_scoring() {
    assert_eq!(MetricsWeights::default().coding_weight, 2);
}
