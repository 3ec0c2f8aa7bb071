// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived financial metrics.
//!
//! Every function here is a pure fold over a borrowed snapshot of records:
//! no I/O, no shared state, the same input always gives the same output.
//! Stored amounts are coerced to `Decimal` on the way in, and a value that
//! is not a number is reported as a [`MetricsError`] naming the record and
//! field instead of being counted as zero. Sums and ratios use checked
//! arithmetic, so a result outside the range of `Decimal` is an error too.

pub mod category;
pub mod loans;
pub mod savings;
pub mod subscriptions;
pub mod totals;

use crate::error::MetricsError;
use crate::models::{
    Amount, ExpenseRecord, IncomeRecord, LoanRecord, ReceiptRecord, SavingsGoalRecord,
    SubscriptionRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub use category::{CategoryStat, UNCATEGORIZED};

pub(crate) const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Human-readable identity of a record, used in error messages.
pub trait Labeled {
    fn label(&self) -> String;
}

/// A record with a single headline amount.
pub trait Monetary: Labeled {
    /// Column the headline amount is read from.
    const FIELD: &'static str = "amount";

    fn amount(&self) -> Result<Decimal, MetricsError>;
}

/// A record that can be grouped by its free-text category.
pub trait Categorized: Monetary {
    fn category(&self) -> Option<&str>;
}

/// A record that falls on a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

fn parse<R: Labeled + ?Sized>(
    rec: &R,
    field: &'static str,
    raw: Option<&Amount>,
) -> Result<Option<Decimal>, MetricsError> {
    match raw {
        None => Ok(None),
        Some(Amount::Number(d)) => Ok(Some(*d)),
        Some(Amount::Text(s)) => {
            let t = s.trim();
            if t.is_empty() {
                return Ok(None);
            }
            t.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(t))
                .map(Some)
                .map_err(|_| MetricsError::InvalidAmount {
                    record: rec.label(),
                    field,
                    value: s.clone(),
                })
        }
    }
}

/// Coerce a field that must hold a number.
pub fn required<R: Labeled + ?Sized>(
    rec: &R,
    field: &'static str,
    raw: Option<&Amount>,
) -> Result<Decimal, MetricsError> {
    parse(rec, field, raw)?.ok_or_else(|| MetricsError::MissingAmount {
        record: rec.label(),
        field,
    })
}

/// Coerce a field whose absence means zero.
pub fn or_zero<R: Labeled + ?Sized>(
    rec: &R,
    field: &'static str,
    raw: Option<&Amount>,
) -> Result<Decimal, MetricsError> {
    Ok(parse(rec, field, raw)?.unwrap_or(Decimal::ZERO))
}

/// Coerce a field whose absence must stay visible to the caller.
pub fn optional<R: Labeled + ?Sized>(
    rec: &R,
    field: &'static str,
    raw: Option<&Amount>,
) -> Result<Option<Decimal>, MetricsError> {
    parse(rec, field, raw)
}

/// `total + amount`, failing with the record that pushed the sum out of range.
pub(crate) fn accumulate<R: Labeled + ?Sized>(
    total: Decimal,
    amount: Decimal,
    rec: &R,
    field: &'static str,
) -> Result<Decimal, MetricsError> {
    total
        .checked_add(amount)
        .ok_or_else(|| MetricsError::overflow(rec.label(), field))
}

/// `part / whole * 100`, or zero when `whole` is zero. `None` if the ratio
/// does not fit in a `Decimal`.
pub(crate) fn percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return Some(Decimal::ZERO);
    }
    part.checked_div(whole)?.checked_mul(HUNDRED)
}

fn describe(kind: &str, id: Option<i64>, name: &str) -> String {
    match id {
        Some(id) => format!("{} #{} '{}'", kind, id, name),
        None => format!("{} '{}'", kind, name),
    }
}

impl Labeled for IncomeRecord {
    fn label(&self) -> String {
        describe("income", self.id, &self.source)
    }
}

impl Monetary for IncomeRecord {
    fn amount(&self) -> Result<Decimal, MetricsError> {
        required(self, "amount", self.amount.as_ref())
    }
}

impl Categorized for IncomeRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Dated for IncomeRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Labeled for ExpenseRecord {
    fn label(&self) -> String {
        describe("expense", self.id, &self.name)
    }
}

impl Monetary for ExpenseRecord {
    fn amount(&self) -> Result<Decimal, MetricsError> {
        required(self, "amount", self.amount.as_ref())
    }
}

impl Categorized for ExpenseRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Dated for ExpenseRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Labeled for ReceiptRecord {
    fn label(&self) -> String {
        describe("receipt", self.id, &self.name)
    }
}

impl Monetary for ReceiptRecord {
    fn amount(&self) -> Result<Decimal, MetricsError> {
        required(self, "amount", self.amount.as_ref())
    }
}

impl Categorized for ReceiptRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Dated for ReceiptRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Labeled for SubscriptionRecord {
    fn label(&self) -> String {
        describe("subscription", self.id, &self.name)
    }
}

// The billed amount per cycle, not the monthly equivalent.
impl Monetary for SubscriptionRecord {
    fn amount(&self) -> Result<Decimal, MetricsError> {
        required(self, "amount", self.amount.as_ref())
    }
}

impl Categorized for SubscriptionRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Labeled for SavingsGoalRecord {
    fn label(&self) -> String {
        describe("savings goal", self.id, &self.name)
    }
}

// A goal's headline amount is what has been saved so far.
impl Monetary for SavingsGoalRecord {
    const FIELD: &'static str = "current_amount";

    fn amount(&self) -> Result<Decimal, MetricsError> {
        or_zero(self, Self::FIELD, self.current_amount.as_ref())
    }
}

impl Categorized for SavingsGoalRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Labeled for LoanRecord {
    fn label(&self) -> String {
        describe("loan", self.id, &self.name)
    }
}

// Outstanding balance.
impl Monetary for LoanRecord {
    const FIELD: &'static str = "current_balance";

    fn amount(&self) -> Result<Decimal, MetricsError> {
        required(self, Self::FIELD, self.current_balance.as_ref())
    }
}
