// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate and per-member planning metrics.
//!
//! Metrics are **computed**, not stored. Every function here is a pure,
//! total function of the roster it is given.

use crate::types::{MemberId, TeamMember};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Default multiplier applied to coding tasks in the productivity score.
pub const DEFAULT_CODING_WEIGHT: u32 = 2;

/// Weighting parameters for productivity scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsWeights {
    /// Multiplier applied to total coding tasks.
    pub coding_weight: u32,
}

impl MetricsWeights {
    #[must_use]
    pub const fn new(coding_weight: u32) -> Self {
        Self { coding_weight }
    }
}

impl Default for MetricsWeights {
    fn default() -> Self {
        Self::new(DEFAULT_CODING_WEIGHT)
    }
}

/// Aggregate metrics for a roster.
///
/// All fields are derived from the roster; none is mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetrics {
    pub total_coding_tasks: u64,
    /// Sum of `qa` over QA and `CoderQA` members only.
    #[serde(rename = "totalQACapacity")]
    pub total_qa_capacity: u64,
    pub total_sampling_tasks: u64,
    /// QA capacity minus sampling demand. Negative means a deficit.
    pub sampling_balance: i64,
    pub is_balanced: bool,
    pub total_completed: u64,
    pub total_targets: u64,
    /// Completed over targets as a rounded percentage, 0 when there are no targets.
    pub overall_performance: u64,
    pub coder_productivity_score: u64,
    pub qa_productivity_score: u64,
    pub total_productivity_score: u64,
}

/// Performance band derived from a member's productivity percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceTier {
    /// 100% or more of target.
    OnTarget,
    /// At least 80% of target.
    AtRisk,
    /// Below 80% of target.
    Behind,
}

impl PerformanceTier {
    /// Classifies a productivity percentage. Lower bounds are inclusive.
    #[must_use]
    pub const fn from_percent(percent: u64) -> Self {
        if percent >= 100 {
            Self::OnTarget
        } else if percent >= 80 {
            Self::AtRisk
        } else {
            Self::Behind
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnTarget => "on-target",
            Self::AtRisk => "at-risk",
            Self::Behind => "behind",
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived values for one member, in the shape the roster table consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMetrics {
    pub member_id: MemberId,
    pub productivity_percent: u64,
    pub tier: PerformanceTier,
    pub sampling_percent: u64,
}

/// Returns `round(numerator / denominator * 100)`, rounding half up.
///
/// A zero denominator yields 0.
fn rounded_percent(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let scaled: u128 = u128::from(numerator) * 200 + u128::from(denominator);
    let divisor: u128 = u128::from(denominator) * 2;
    (scaled / divisor).to_u64().unwrap_or(u64::MAX)
}

/// Computes aggregate metrics with the default weighting.
#[must_use]
pub fn compute_metrics(members: &[TeamMember]) -> SubmissionMetrics {
    compute_metrics_with(members, MetricsWeights::default())
}

/// Computes aggregate metrics for a roster.
///
/// # Arguments
///
/// * `members` - The roster to aggregate
/// * `weights` - Productivity score weighting
#[must_use]
pub fn compute_metrics_with(members: &[TeamMember], weights: MetricsWeights) -> SubmissionMetrics {
    let total_coding_tasks: u64 = members.iter().map(|m| u64::from(m.coding)).sum();
    let total_qa_capacity: u64 = members
        .iter()
        .filter(|m| m.role.provides_qa())
        .map(|m| u64::from(m.qa))
        .sum();
    let total_sampling_tasks: u64 = members.iter().map(|m| u64::from(m.sampling)).sum();
    let total_completed: u64 = members.iter().map(|m| u64::from(m.completed)).sum();
    let total_targets: u64 = members.iter().map(|m| u64::from(m.target)).sum();

    // Both operands are non-negative and fit in i64, so the difference cannot overflow.
    let sampling_balance: i64 = total_qa_capacity.to_i64().unwrap_or(i64::MAX)
        - total_sampling_tasks.to_i64().unwrap_or(i64::MAX);

    let coder_productivity_score: u64 =
        total_coding_tasks.saturating_mul(u64::from(weights.coding_weight));
    let qa_productivity_score: u64 = total_qa_capacity;

    SubmissionMetrics {
        total_coding_tasks,
        total_qa_capacity,
        total_sampling_tasks,
        sampling_balance,
        is_balanced: total_qa_capacity >= total_sampling_tasks,
        total_completed,
        total_targets,
        overall_performance: rounded_percent(total_completed, total_targets),
        coder_productivity_score,
        qa_productivity_score,
        total_productivity_score: coder_productivity_score.saturating_add(qa_productivity_score),
    }
}

/// Completed over target as a rounded percentage, 0 when the target is 0.
#[must_use]
pub fn productivity_percent(member: &TeamMember) -> u64 {
    rounded_percent(u64::from(member.completed), u64::from(member.target))
}

/// Sampling over coding as a rounded percentage, 0 when coding is 0.
#[must_use]
pub fn sampling_percent(member: &TeamMember) -> u64 {
    rounded_percent(u64::from(member.sampling), u64::from(member.coding))
}

/// Computes the per-member derived values, in roster order.
#[must_use]
pub fn member_metrics(members: &[TeamMember]) -> Vec<MemberMetrics> {
    members
        .iter()
        .map(|member| {
            let productivity: u64 = productivity_percent(member);
            MemberMetrics {
                member_id: member.id,
                productivity_percent: productivity,
                tier: PerformanceTier::from_percent(productivity),
                sampling_percent: sampling_percent(member),
            }
        })
        .collect()
}
