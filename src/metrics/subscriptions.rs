// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Labeled, Monetary, accumulate};
use crate::error::MetricsError;
use crate::models::{BillingCycle, SubscriptionRecord, SubscriptionStatus};
use rust_decimal::Decimal;
use serde::Serialize;

const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
const MONTHS_PER_QUARTER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

impl BillingCycle {
    /// Monthly-equivalent of one charge on this cycle. Unrecognized cycles
    /// are taken to be monthly already. `None` if a weekly charge is too
    /// large to multiply out.
    pub fn monthly_equivalent(&self, amount: Decimal) -> Option<Decimal> {
        match self {
            BillingCycle::Monthly => Some(amount),
            BillingCycle::Yearly => amount.checked_div(MONTHS_PER_YEAR),
            BillingCycle::Quarterly => amount.checked_div(MONTHS_PER_QUARTER),
            BillingCycle::Weekly => amount.checked_mul(WEEKS_PER_MONTH),
            BillingCycle::Other(cycle) => {
                tracing::debug!(cycle = %cycle, "unknown billing cycle, treating as monthly");
                Some(amount)
            }
        }
    }
}

pub fn active_only(
    subs: &[SubscriptionRecord],
) -> impl Iterator<Item = &SubscriptionRecord> + '_ {
    subs.iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
}

/// Monthly-equivalent cost of a single subscription, regardless of status.
pub fn monthly_cost(sub: &SubscriptionRecord) -> Result<Decimal, MetricsError> {
    sub.billing_cycle
        .monthly_equivalent(sub.amount()?)
        .ok_or_else(|| MetricsError::overflow(sub.label(), "monthly_cost"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionCosts {
    pub total_monthly: Decimal,
    pub total_yearly: Decimal,
    pub active_count: usize,
}

/// Normalized totals over active subscriptions. Cancelled ones cost nothing
/// here but still show up in listings and category breakdowns.
pub fn subscription_costs(subs: &[SubscriptionRecord]) -> Result<SubscriptionCosts, MetricsError> {
    let mut total_monthly = Decimal::ZERO;
    let mut active_count = 0;
    for s in active_only(subs) {
        total_monthly = accumulate(total_monthly, monthly_cost(s)?, s, "monthly_cost")?;
        active_count += 1;
    }
    let total_yearly = total_monthly
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| MetricsError::overflow("active subscriptions", "total_yearly"))?;
    Ok(SubscriptionCosts {
        total_monthly,
        total_yearly,
        active_count,
    })
}

/// Active subscriptions with a known next charge, soonest first.
pub fn upcoming_renewals(subs: &[SubscriptionRecord]) -> Vec<&SubscriptionRecord> {
    let mut due: Vec<_> = active_only(subs)
        .filter(|s| s.next_billing_date.is_some())
        .collect();
    due.sort_by_key(|s| s.next_billing_date);
    due
}
