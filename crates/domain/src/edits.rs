// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sparse edit overrides layered over a persisted roster.
//!
//! An [`EditBuffer`] maps member ids to [`MemberEdits`], each holding only the
//! fields that were touched. Merging is a per-field overlay: a buffered value
//! always wins over the persisted one.

use crate::error::DomainError;
use crate::types::{MemberField, MemberId, Role, TeamMember, clamp_units};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partial field overrides for a single member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEdits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

impl MemberEdits {
    /// Captures every editable field of `member`.
    #[must_use]
    pub fn snapshot(member: &TeamMember) -> Self {
        Self {
            name: Some(member.name.clone()),
            role: Some(member.role),
            coding: Some(member.coding),
            qa: Some(member.qa),
            sampling: Some(member.sampling),
            target: Some(member.target),
        }
    }

    /// Returns true if no field is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.coding.is_none()
            && self.qa.is_none()
            && self.sampling.is_none()
            && self.target.is_none()
    }

    /// Produces the proposed member: `base` with every buffered field applied.
    #[must_use]
    pub fn overlay(&self, base: &TeamMember) -> TeamMember {
        TeamMember {
            id: base.id,
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            role: self.role.unwrap_or(base.role),
            coding: self.coding.unwrap_or(base.coding),
            qa: self.qa.unwrap_or(base.qa),
            sampling: self.sampling.unwrap_or(base.sampling),
            target: self.target.unwrap_or(base.target),
            completed: base.completed,
        }
    }

    /// Writes a single field update into the overrides.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => self.name = Some(name),
            FieldUpdate::Coding(value) => self.coding = Some(value),
            FieldUpdate::Qa(value) => self.qa = Some(value),
            FieldUpdate::Sampling(value) => self.sampling = Some(value),
            FieldUpdate::Target(value) => self.target = Some(value),
        }
    }

    /// Sets the role and applies the role reset policy.
    ///
    /// - `QA` zeroes `coding` and `sampling`
    /// - `Coder` zeroes `qa`
    /// - `CoderQA` changes only the role
    pub fn change_role(&mut self, role: Role) {
        self.role = Some(role);
        match role {
            Role::Qa => {
                self.coding = Some(0);
                self.sampling = Some(0);
            }
            Role::Coder => self.qa = Some(0),
            Role::CoderQa => {}
        }
    }
}

/// A single field write coming from the edit workflow.
///
/// Role changes are not field updates: they go through [`apply_role_change`]
/// so the reset policy always runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Coding(u32),
    Qa(u32),
    Sampling(u32),
    Target(u32),
}

impl FieldUpdate {
    /// Builds a numeric update, clamping negative input to zero.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` if `field` is not a numeric
    /// planning field (`name`, `role` and `completed` are rejected).
    pub fn numeric(field: MemberField, value: i64) -> Result<Self, DomainError> {
        let units: u32 = clamp_units(value);
        match field {
            MemberField::Coding => Ok(Self::Coding(units)),
            MemberField::Qa => Ok(Self::Qa(units)),
            MemberField::Sampling => Ok(Self::Sampling(units)),
            MemberField::Target => Ok(Self::Target(units)),
            MemberField::Name | MemberField::Role | MemberField::Completed => {
                Err(DomainError::InvalidField(field.as_str().to_string()))
            }
        }
    }

    /// Returns the field this update writes.
    #[must_use]
    pub const fn field(&self) -> MemberField {
        match self {
            Self::Name(_) => MemberField::Name,
            Self::Coding(_) => MemberField::Coding,
            Self::Qa(_) => MemberField::Qa,
            Self::Sampling(_) => MemberField::Sampling,
            Self::Target(_) => MemberField::Target,
        }
    }
}

/// Sparse map from member id to buffered overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditBuffer {
    entries: BTreeMap<MemberId, MemberEdits>,
}

impl EditBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Creates a buffer holding a full snapshot of every member in `roster`.
    #[must_use]
    pub fn snapshot(roster: &[TeamMember]) -> Self {
        Self {
            entries: roster
                .iter()
                .map(|member| (member.id, MemberEdits::snapshot(member)))
                .collect(),
        }
    }

    /// Returns the overrides for a member, if any.
    #[must_use]
    pub fn get(&self, member_id: MemberId) -> Option<&MemberEdits> {
        self.entries.get(&member_id)
    }

    /// Returns the overrides for a member, creating an empty entry if needed.
    pub fn entry_mut(&mut self, member_id: MemberId) -> &mut MemberEdits {
        self.entries.entry(member_id).or_default()
    }

    /// Replaces the overrides for a member.
    pub fn insert(&mut self, member_id: MemberId, edits: MemberEdits) {
        self.entries.insert(member_id, edits);
    }

    /// Drops the overrides for a member.
    pub fn remove(&mut self, member_id: MemberId) -> Option<MemberEdits> {
        self.entries.remove(&member_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates buffered members in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &MemberEdits)> {
        self.entries.iter().map(|(id, edits)| (*id, edits))
    }

    /// Returns the proposed value of `base` under this buffer.
    #[must_use]
    pub fn merged_member(&self, base: &TeamMember) -> TeamMember {
        self.get(base.id)
            .map_or_else(|| base.clone(), |edits| edits.overlay(base))
    }

    /// Overlays the buffer onto `roster`, preserving roster order.
    ///
    /// Buffer entries for ids absent from `roster` are ignored.
    #[must_use]
    pub fn merge_onto(&self, roster: &[TeamMember]) -> Vec<TeamMember> {
        roster
            .iter()
            .map(|member| self.merged_member(member))
            .collect()
    }
}

/// Applies a role change to the buffered edits of one member.
///
/// This must run before validation on every role change. It sets the role and
/// applies the reset policy (see [`MemberEdits::change_role`]); other fields are
/// left untouched.
#[must_use]
pub fn apply_role_change(mut edits: EditBuffer, member_id: MemberId, role: Role) -> EditBuffer {
    edits.entry_mut(member_id).change_role(role);
    edits
}
