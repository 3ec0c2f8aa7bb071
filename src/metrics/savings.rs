// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Labeled, Monetary, accumulate, or_zero, percent};
use crate::error::MetricsError;
use crate::models::SavingsGoalRecord;
use rust_decimal::Decimal;

fn target(goal: &SavingsGoalRecord) -> Result<Decimal, MetricsError> {
    or_zero(goal, "target_amount", goal.target_amount.as_ref())
}

/// Saved over target, in percent. May exceed 100 for an over-saved goal;
/// zero when the goal has no target.
pub fn goal_progress(goal: &SavingsGoalRecord) -> Result<Decimal, MetricsError> {
    percent(goal.amount()?, target(goal)?)
        .ok_or_else(|| MetricsError::overflow(goal.label(), "progress"))
}

pub fn total_savings_target(goals: &[SavingsGoalRecord]) -> Result<Decimal, MetricsError> {
    let mut total = Decimal::ZERO;
    for g in goals {
        total = accumulate(total, target(g)?, g, "target_amount")?;
    }
    Ok(total)
}

/// Progress of all goals together: total saved over total target. Large
/// goals weigh more than small ones, unlike an average of percentages.
pub fn overall_progress(goals: &[SavingsGoalRecord]) -> Result<Decimal, MetricsError> {
    let mut saved = Decimal::ZERO;
    for g in goals {
        saved = accumulate(saved, g.amount()?, g, SavingsGoalRecord::FIELD)?;
    }
    percent(saved, total_savings_target(goals)?)
        .ok_or_else(|| MetricsError::overflow("all savings goals", "progress"))
}

/// New saved amount, or `None` if it would not fit in a `Decimal`.
pub fn apply_contribution(current_amount: Decimal, contribution: Decimal) -> Option<Decimal> {
    current_amount.checked_add(contribution)
}
