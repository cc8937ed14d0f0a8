// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{MemberField, MemberId, TeamMember};
use std::collections::BTreeMap;

/// Field-level validation messages for one member. Empty means valid.
pub type FieldErrors = BTreeMap<MemberField, String>;

/// Validation messages for a roster, keyed by member. Only members with at
/// least one error appear.
pub type RosterErrors = BTreeMap<MemberId, FieldErrors>;

/// Validates the proposed values of a single member.
///
/// `proposed` must already be the merged value (persisted fields overlaid with
/// any buffered edits). Only two rules exist:
/// - `target` may not exceed `coding + qa`
/// - a Coder's `sampling` may not exceed `coding`
///
/// This function is pure, deterministic, and has no side effects.
///
/// # Arguments
///
/// * `proposed` - The merged member values to check
///
/// # Returns
///
/// A map from field to message. An empty map means the values are acceptable.
#[must_use]
pub fn validate_member(proposed: &TeamMember) -> FieldErrors {
    let mut errors: FieldErrors = FieldErrors::new();

    // Rule: target is bounded by total capacity
    let max_target: u64 = proposed.max_target();
    if u64::from(proposed.target) > max_target {
        errors.insert(
            MemberField::Target,
            format!("Target cannot exceed {max_target} (coding + QA capacity)"),
        );
    }

    // Rule: a Coder cannot generate more sampling than coding work
    if proposed.role.limits_sampling_to_coding() && proposed.sampling > proposed.coding {
        errors.insert(
            MemberField::Sampling,
            format!(
                "Sampling cannot exceed {} (coding tasks)",
                proposed.coding
            ),
        );
    }

    errors
}

/// Validates every member of a roster.
///
/// # Returns
///
/// Errors keyed by member id; members without errors are omitted, so an empty
/// map means the whole roster is acceptable.
#[must_use]
pub fn validate_all(members: &[TeamMember]) -> RosterErrors {
    members
        .iter()
        .filter_map(|member| {
            let errors: FieldErrors = validate_member(member);
            if errors.is_empty() {
                None
            } else {
                Some((member.id, errors))
            }
        })
        .collect()
}

/// Validates a member display name.
///
/// Names are only checked when a member is added to a roster.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_member_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}
