// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Clock, FixedClock, IdSource, SequentialIdSource};
use capplan_domain::SubmissionId;
use time::macros::datetime;

#[test]
fn test_fixed_clock_never_advances() {
    let clock: FixedClock = FixedClock(datetime!(2026-01-01 12:00 UTC));
    assert_eq!(clock.now(), clock.now());
    assert_eq!(clock.now(), datetime!(2026-01-01 12:00 UTC));
}

#[test]
fn test_sequential_ids_start_at_one() {
    let ids: SequentialIdSource = SequentialIdSource::new("SUB");
    assert_eq!(ids.next_id(), SubmissionId::new("SUB-1"));
    assert_eq!(ids.next_id(), SubmissionId::new("SUB-2"));
}

#[test]
fn test_sequential_ids_resume_from_offset() {
    let ids: SequentialIdSource = SequentialIdSource::starting_at("SUB", 42);
    assert_eq!(ids.next_id(), SubmissionId::new("SUB-42"));
}

#[test]
fn test_sequential_ids_are_unique_across_threads() {
    let ids: SequentialIdSource = SequentialIdSource::new("SUB");
    let mut allocated: Vec<SubmissionId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| (0..25).map(|_| ids.next_id()).collect::<Vec<_>>()))
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });
    allocated.sort();
    allocated.dedup();
    assert_eq!(allocated.len(), 100);
}
