// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The draft/edit workflow over a team roster.
//!
//! A session owns the persisted roster. Entering edit mode snapshots the
//! roster into an [`EditBuffer`]; field and role edits go to the buffer and
//! re-validate only the touched member. Saving or submitting merges the buffer
//! back once every buffered member is valid. `completed` counts bypass all of
//! this and are written straight to the persisted roster.

use crate::clock::{Clock, IdSource};
use crate::error::CoreError;
use crate::lifecycle::{self, LifecycleResult, SubmissionDraft};
use crate::store::SubmissionStore;
use capplan_domain::{
    DomainError, EditBuffer, FieldErrors, FieldUpdate, MemberEdits, MemberId, MemberMetrics,
    MetricsWeights, Role, RosterErrors, SubmissionMetrics, TeamMember, apply_role_change,
    clamp_units, compute_metrics_with, member_metrics, validate_member, validate_member_name,
};

/// A planning session over one team's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningSession {
    /// Source of truth, in display order.
    roster: Vec<TeamMember>,
    /// Present only while in edit mode.
    edit_buffer: Option<EditBuffer>,
    validation_errors: RosterErrors,
    weights: MetricsWeights,
}

impl PlanningSession {
    /// Creates a session over `roster` with default metric weights.
    #[must_use]
    pub fn new(roster: Vec<TeamMember>) -> Self {
        Self::with_weights(roster, MetricsWeights::default())
    }

    /// Creates a session over `roster` with explicit metric weights.
    #[must_use]
    pub const fn with_weights(roster: Vec<TeamMember>, weights: MetricsWeights) -> Self {
        Self {
            roster,
            edit_buffer: None,
            validation_errors: RosterErrors::new(),
            weights,
        }
    }

    /// The persisted roster, ignoring any buffered edits.
    #[must_use]
    pub fn roster(&self) -> &[TeamMember] {
        &self.roster
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    #[must_use]
    pub const fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.edit_buffer.as_ref()
    }

    /// Current validation errors from the last edit, save or submit attempt.
    #[must_use]
    pub const fn validation_errors(&self) -> &RosterErrors {
        &self.validation_errors
    }

    #[must_use]
    pub const fn weights(&self) -> MetricsWeights {
        self.weights
    }

    /// The roster with buffered edits overlaid. Equal to [`Self::roster`] outside edit mode.
    #[must_use]
    pub fn merged_roster(&self) -> Vec<TeamMember> {
        self.edit_buffer.as_ref().map_or_else(
            || self.roster.clone(),
            |buffer| buffer.merge_onto(&self.roster),
        )
    }

    /// Aggregate metrics over the merged roster.
    #[must_use]
    pub fn metrics(&self) -> SubmissionMetrics {
        compute_metrics_with(&self.merged_roster(), self.weights)
    }

    /// Per-member derived values over the merged roster.
    #[must_use]
    pub fn member_metrics(&self) -> Vec<MemberMetrics> {
        member_metrics(&self.merged_roster())
    }

    /// Enters edit mode by snapshotting every member into the edit buffer.
    ///
    /// Does nothing if the session is already editing, so pending edits are kept.
    pub fn enter_edit(&mut self) {
        if self.edit_buffer.is_none() {
            self.edit_buffer = Some(EditBuffer::snapshot(&self.roster));
        }
    }

    /// Discards buffered edits and validation errors and leaves edit mode.
    pub fn cancel_edit(&mut self) {
        self.edit_buffer = None;
        self.validation_errors.clear();
    }

    /// Writes a field edit into the buffer and re-validates that member.
    ///
    /// # Returns
    ///
    /// The member's field errors after the edit (empty if valid).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not in edit mode
    /// - The member does not exist
    /// - The field is not editable for the member's current role
    pub fn update_field(
        &mut self,
        member_id: MemberId,
        update: FieldUpdate,
    ) -> Result<FieldErrors, CoreError> {
        let base: &TeamMember = find_member(&self.roster, member_id)?;
        let buffer: &mut EditBuffer = self.edit_buffer.as_mut().ok_or(CoreError::NotInEditMode)?;

        let role: Role = buffer.merged_member(base).role;
        if !role.is_editable(update.field()) {
            return Err(CoreError::DomainViolation(DomainError::FieldNotEditable {
                member_id,
                field: update.field(),
                role,
            }));
        }

        buffer.entry_mut(member_id).apply(update);
        self.revalidate(member_id)
    }

    /// Changes a member's role in the buffer, applying the reset policy first,
    /// then re-validates that member.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not in edit mode or the member does not exist.
    pub fn update_role(&mut self, member_id: MemberId, role: Role) -> Result<FieldErrors, CoreError> {
        find_member(&self.roster, member_id)?;
        let buffer: EditBuffer = self.edit_buffer.take().ok_or(CoreError::NotInEditMode)?;
        self.edit_buffer = Some(apply_role_change(buffer, member_id, role));
        self.revalidate(member_id)
    }

    /// Merges the buffer into the persisted roster and leaves edit mode.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any buffered member is invalid; the
    /// session then stays in edit mode with its errors recorded and the
    /// roster untouched. Returns `CoreError::NotInEditMode` outside edit mode.
    pub fn save_draft(&mut self) -> Result<(), CoreError> {
        if self.edit_buffer.is_none() {
            return Err(CoreError::NotInEditMode);
        }
        let merged: Vec<TeamMember> = self.gate_buffered_members()?;
        self.commit(merged);
        Ok(())
    }

    /// Validates, submits the merged roster for review, and on success
    /// performs the same merge as [`Self::save_draft`].
    ///
    /// Works in and out of edit mode; outside edit mode the persisted roster is submitted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any member is invalid (nothing is
    /// stored and edit state is kept), or any error from the store.
    pub fn submit<S: SubmissionStore + ?Sized>(
        &mut self,
        store: &S,
        draft: SubmissionDraft,
        ids: &dyn IdSource,
        clock: &dyn Clock,
    ) -> Result<LifecycleResult, CoreError> {
        let merged: Vec<TeamMember> = self.gate_buffered_members()?;
        let result: LifecycleResult =
            lifecycle::submit(store, &merged, draft, self.weights, ids, clock).inspect_err(
                |err| {
                    if let CoreError::Validation(errors) = err {
                        self.validation_errors.clone_from(errors);
                    }
                },
            )?;
        self.commit(merged);
        Ok(result)
    }

    /// Records a member's completed count directly on the persisted roster.
    ///
    /// Negative input is clamped to zero. This bypasses edit mode and
    /// validation entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist.
    pub fn update_completed(&mut self, member_id: MemberId, value: i64) -> Result<u32, CoreError> {
        let member: &mut TeamMember = self
            .roster
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or(CoreError::DomainViolation(DomainError::MemberNotFound(
                member_id,
            )))?;
        member.completed = clamp_units(value);
        Ok(member.completed)
    }

    /// Appends a new member with every count at zero.
    ///
    /// The id is one past the largest id in the roster. While editing, the new
    /// member is also snapshotted into the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the largest id is taken.
    pub fn add_member(&mut self, name: &str, role: Role) -> Result<MemberId, CoreError> {
        validate_member_name(name)?;
        let next: u32 = self
            .roster
            .iter()
            .map(|m| m.id.value())
            .max()
            .map_or(Some(1), |max| max.checked_add(1))
            .ok_or(CoreError::DomainViolation(DomainError::MemberIdsExhausted))?;
        let member: TeamMember = TeamMember::empty(MemberId::new(next), name.trim().to_string(), role);

        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.insert(member.id, MemberEdits::snapshot(&member));
        }
        let id: MemberId = member.id;
        self.roster.push(member);
        Ok(id)
    }

    /// Removes a member from the roster, the buffer and the error map.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist.
    pub fn remove_member(&mut self, member_id: MemberId) -> Result<TeamMember, CoreError> {
        let index: usize = self
            .roster
            .iter()
            .position(|m| m.id == member_id)
            .ok_or(CoreError::DomainViolation(DomainError::MemberNotFound(
                member_id,
            )))?;
        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.remove(member_id);
        }
        self.validation_errors.remove(&member_id);
        Ok(self.roster.remove(index))
    }

    /// Re-validates one member against its merged value and records the result.
    fn revalidate(&mut self, member_id: MemberId) -> Result<FieldErrors, CoreError> {
        let base: &TeamMember = find_member(&self.roster, member_id)?;
        let proposed: TeamMember = self
            .edit_buffer
            .as_ref()
            .map_or_else(|| base.clone(), |buffer| buffer.merged_member(base));

        let errors: FieldErrors = validate_member(&proposed);
        if errors.is_empty() {
            self.validation_errors.remove(&member_id);
        } else {
            self.validation_errors.insert(member_id, errors.clone());
        }
        Ok(errors)
    }

    /// Validates every buffered member and returns the merged roster if all pass.
    ///
    /// On failure the errors replace the session's error map.
    fn gate_buffered_members(&mut self) -> Result<Vec<TeamMember>, CoreError> {
        let merged: Vec<TeamMember> = self.merged_roster();
        let errors: RosterErrors = self.edit_buffer.as_ref().map_or_else(RosterErrors::new, |buffer| {
            merged
                .iter()
                .filter(|member| buffer.get(member.id).is_some())
                .filter_map(|member| {
                    let member_errors: FieldErrors = validate_member(member);
                    (!member_errors.is_empty()).then_some((member.id, member_errors))
                })
                .collect()
        });

        if errors.is_empty() {
            Ok(merged)
        } else {
            self.validation_errors.clone_from(&errors);
            Err(CoreError::Validation(errors))
        }
    }

    fn commit(&mut self, merged: Vec<TeamMember>) {
        self.roster = merged;
        self.edit_buffer = None;
        self.validation_errors.clear();
    }
}

fn find_member(roster: &[TeamMember], member_id: MemberId) -> Result<&TeamMember, CoreError> {
    roster
        .iter()
        .find(|m| m.id == member_id)
        .ok_or(CoreError::DomainViolation(DomainError::MemberNotFound(
            member_id,
        )))
}
