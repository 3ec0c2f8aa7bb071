// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::totals::total_amount;
use super::{Labeled, Monetary, accumulate, optional, or_zero, percent, required};
use crate::error::MetricsError;
use crate::models::{LoanRecord, LoanStatus};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanProgress {
    pub amount_paid: Decimal,
    /// Not clamped: a balance above the initial amount gives a negative
    /// value, an overpaid loan gives more than 100.
    pub progress_percent: Decimal,
}

/// `None` when the paid amount or its percentage does not fit in a `Decimal`.
pub fn progress(initial_amount: Decimal, current_balance: Decimal) -> Option<LoanProgress> {
    let amount_paid = initial_amount.checked_sub(current_balance)?;
    Some(LoanProgress {
        amount_paid,
        progress_percent: percent(amount_paid, initial_amount)?,
    })
}

pub fn loan_progress(loan: &LoanRecord) -> Result<LoanProgress, MetricsError> {
    let initial = required(loan, "initial_amount", loan.initial_amount.as_ref())?;
    let balance = loan.amount()?;
    progress(initial, balance).ok_or_else(|| MetricsError::overflow(loan.label(), "progress"))
}

/// Whole months of `monthly_payment` needed to clear `balance`. `None` when
/// no payment is being made, since no payoff can be projected, and when the
/// count is too large to represent.
pub fn months_remaining(balance: Decimal, monthly_payment: Decimal) -> Option<u32> {
    if monthly_payment <= Decimal::ZERO {
        return None;
    }
    if balance <= Decimal::ZERO {
        return Some(0);
    }
    balance.checked_div(monthly_payment)?.ceil().to_u32()
}

/// `today` moved forward by whole calendar months.
pub fn projected_payoff_date(today: NaiveDate, months: u32) -> Option<NaiveDate> {
    today.checked_add_months(Months::new(months))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayoffProjection {
    pub months_remaining: Option<u32>,
    pub payoff_date: Option<NaiveDate>,
}

pub fn payoff_projection(
    loan: &LoanRecord,
    today: NaiveDate,
) -> Result<PayoffProjection, MetricsError> {
    let balance = loan.amount()?;
    let payment = optional(loan, "monthly_payment", loan.monthly_payment.as_ref())?;
    let months = payment.and_then(|p| months_remaining(balance, p));
    Ok(PayoffProjection {
        months_remaining: months,
        payoff_date: months.and_then(|m| projected_payoff_date(today, m)),
    })
}

/// Balance after a non-negative payment. Never negative.
pub fn apply_payment(balance: Decimal, payment: Decimal) -> Decimal {
    // Only an underflow can fail here, which clamps to zero anyway.
    balance
        .checked_sub(payment)
        .map_or(Decimal::ZERO, |left| left.max(Decimal::ZERO))
}

pub fn status_after_payment(status: LoanStatus, new_balance: Decimal) -> LoanStatus {
    if status == LoanStatus::Active && new_balance.is_zero() {
        LoanStatus::PaidOff
    } else {
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanPortfolio {
    pub total_debt: Decimal,
    pub total_initial: Decimal,
    pub total_paid: Decimal,
    pub progress_percent: Decimal,
}

/// Combined progress of every loan regardless of status, weighted by loan
/// size. `total_debt` is the same figure the dashboard reports.
pub fn loan_portfolio(loans: &[LoanRecord]) -> Result<LoanPortfolio, MetricsError> {
    let total_debt = total_amount(loans)?;
    let mut total_initial = Decimal::ZERO;
    for loan in loans {
        let initial = required(loan, "initial_amount", loan.initial_amount.as_ref())?;
        total_initial = accumulate(total_initial, initial, loan, "initial_amount")?;
    }
    let overflow = || MetricsError::overflow("all loans", "progress");
    let total_paid = total_initial.checked_sub(total_debt).ok_or_else(overflow)?;
    Ok(LoanPortfolio {
        total_debt,
        total_initial,
        total_paid,
        progress_percent: percent(total_paid, total_initial).ok_or_else(overflow)?,
    })
}

pub fn total_monthly_payments(loans: &[LoanRecord]) -> Result<Decimal, MetricsError> {
    let mut total = Decimal::ZERO;
    for loan in loans {
        let payment = or_zero(loan, "monthly_payment", loan.monthly_payment.as_ref())?;
        total = accumulate(total, payment, loan, "monthly_payment")?;
    }
    Ok(total)
}

pub fn average_interest_rate(loans: &[LoanRecord]) -> Result<Decimal, MetricsError> {
    if loans.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let mut total = Decimal::ZERO;
    for loan in loans {
        let rate = or_zero(loan, "interest_rate", loan.interest_rate.as_ref())?;
        total = accumulate(total, rate, loan, "interest_rate")?;
    }
    Ok(total / Decimal::from(loans.len()))
}
