// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time and id sources injected into the submission lifecycle.

use capplan_domain::SubmissionId;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Allocator of new submission ids.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> SubmissionId;
}

/// Allocates `PREFIX-1`, `PREFIX-2`, ... from an atomic counter.
#[derive(Debug)]
pub struct SequentialIdSource {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdSource {
    /// Creates a source starting at 1.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Creates a source whose first id uses `next`.
    #[must_use]
    pub fn starting_at(prefix: &str, next: u64) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicU64::new(next),
        }
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&self) -> SubmissionId {
        let n: u64 = self.next.fetch_add(1, Ordering::SeqCst);
        SubmissionId::new(&format!("{}-{n}", self.prefix))
    }
}
