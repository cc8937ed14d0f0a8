// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Stable identifier of a team member within a roster.
///
/// Ids are never reused while the member exists and survive role changes,
/// edits and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u32);

impl MemberId {
    /// Creates a new `MemberId`.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a team member plays in a planning period.
///
/// Roles are a closed set. Each role carries its own table of editable
/// capacity fields, see [`Role::editable_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Writes code and generates sampling work for QA.
    Coder,
    /// Provides QA capacity only.
    #[serde(rename = "QA")]
    Qa,
    /// Splits effort between coding and QA.
    #[serde(rename = "CoderQA")]
    CoderQa,
}

const CODER_FIELDS: &[MemberField] = &[
    MemberField::Name,
    MemberField::Role,
    MemberField::Coding,
    MemberField::Sampling,
    MemberField::Target,
];

const QA_FIELDS: &[MemberField] = &[
    MemberField::Name,
    MemberField::Role,
    MemberField::Qa,
    MemberField::Target,
];

const CODER_QA_FIELDS: &[MemberField] = &[
    MemberField::Name,
    MemberField::Role,
    MemberField::Coding,
    MemberField::Qa,
    MemberField::Sampling,
    MemberField::Target,
];

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::Coder, Self::Qa, Self::CoderQa];

    /// Returns the string representation of this role.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coder => "Coder",
            Self::Qa => "QA",
            Self::CoderQa => "CoderQA",
        }
    }

    /// Returns the fields a member with this role may edit while planning.
    ///
    /// `completed` never appears here: it is tracked outside the edit pipeline.
    #[must_use]
    pub const fn editable_fields(&self) -> &'static [MemberField] {
        match self {
            Self::Coder => CODER_FIELDS,
            Self::Qa => QA_FIELDS,
            Self::CoderQa => CODER_QA_FIELDS,
        }
    }

    /// Returns whether `field` is editable for this role.
    #[must_use]
    pub fn is_editable(&self, field: MemberField) -> bool {
        self.editable_fields().contains(&field)
    }

    /// Returns whether a member's `qa` value counts toward team QA capacity.
    #[must_use]
    pub const fn provides_qa(&self) -> bool {
        matches!(self, Self::Qa | Self::CoderQa)
    }

    /// Returns whether the sampling invariant (`sampling <= coding`) applies.
    #[must_use]
    pub const fn limits_sampling_to_coding(&self) -> bool {
        matches!(self, Self::Coder)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Coder" => Ok(Self::Coder),
            "QA" => Ok(Self::Qa),
            "CoderQA" => Ok(Self::CoderQa),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Names a single field of a [`TeamMember`].
///
/// Used as the key of validation error maps and of the role editable-field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberField {
    Name,
    Role,
    Coding,
    Qa,
    Sampling,
    Target,
    Completed,
}

impl MemberField {
    /// Returns the string representation of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Role => "role",
            Self::Coding => "coding",
            Self::Qa => "qa",
            Self::Sampling => "sampling",
            Self::Target => "target",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for MemberField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "role" => Ok(Self::Role),
            "coding" => Ok(Self::Coding),
            "qa" => Ok(Self::Qa),
            "sampling" => Ok(Self::Sampling),
            "target" => Ok(Self::Target),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidField(s.to_string())),
        }
    }
}

impl std::fmt::Display for MemberField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member of a team roster together with their planned capacity.
///
/// Invariants (checked by [`crate::validate_member`], not by construction):
/// - `target <= coding + qa`
/// - for `Role::Coder`, `sampling <= coding`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Stable member id.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Current role.
    pub role: Role,
    /// Planned coding capacity units.
    #[serde(deserialize_with = "clamped_units")]
    pub coding: u32,
    /// Planned QA capacity units.
    #[serde(deserialize_with = "clamped_units")]
    pub qa: u32,
    /// Planned sampling count.
    #[serde(deserialize_with = "clamped_units")]
    pub sampling: u32,
    /// Target task count.
    #[serde(deserialize_with = "clamped_units")]
    pub target: u32,
    /// Tasks completed so far.
    #[serde(deserialize_with = "clamped_units")]
    pub completed: u32,
}

impl TeamMember {
    /// Creates a new `TeamMember`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        id: MemberId,
        name: String,
        role: Role,
        coding: u32,
        qa: u32,
        sampling: u32,
        target: u32,
        completed: u32,
    ) -> Self {
        Self {
            id,
            name,
            role,
            coding,
            qa,
            sampling,
            target,
            completed,
        }
    }

    /// Creates a member with the given role and every count set to zero.
    #[must_use]
    pub const fn empty(id: MemberId, name: String, role: Role) -> Self {
        Self::new(id, name, role, 0, 0, 0, 0, 0)
    }

    /// Returns the largest target this member's capacity allows.
    #[must_use]
    pub fn max_target(&self) -> u64 {
        u64::from(self.coding) + u64::from(self.qa)
    }
}

/// Clamps a raw numeric input to the unsigned unit range.
///
/// Negative input becomes zero; values beyond `u32::MAX` saturate.
#[must_use]
pub fn clamp_units(value: i64) -> u32 {
    value.max(0).to_u32().unwrap_or(u32::MAX)
}

/// Reads a count as a signed integer and clamps it with [`clamp_units`], so
/// rosters arriving over the wire get the same treatment as field edits.
fn clamped_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    i64::deserialize(deserializer).map(clamp_units)
}
