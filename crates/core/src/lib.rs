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

mod clock;
mod error;
mod lifecycle;
mod session;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use clock::{Clock, FixedClock, IdSource, SequentialIdSource, SystemClock};
pub use error::CoreError;
pub use lifecycle::{LifecycleResult, SubmissionDraft, approve, reject, submit};
pub use session::PlanningSession;
pub use store::{DateRange, StoreError, SubmissionFilter, SubmissionStore};

/// Lists submissions matching `filter`, newest first.
///
/// This is a read-only query and produces no audit events.
///
/// # Errors
///
/// Returns `CoreError::Store` if the store cannot be read.
pub fn list_submissions<S: SubmissionStore + ?Sized>(
    store: &S,
    filter: &SubmissionFilter,
) -> Result<Vec<capplan_domain::SubmissionRecord>, CoreError> {
    Ok(store.list(filter)?)
}

/// Fetches one submission by id.
///
/// # Errors
///
/// Returns `CoreError::SubmissionNotFound` for unknown ids.
pub fn get_submission<S: SubmissionStore + ?Sized>(
    store: &S,
    id: &capplan_domain::SubmissionId,
) -> Result<capplan_domain::SubmissionRecord, CoreError> {
    Ok(store.get(id)?)
}
