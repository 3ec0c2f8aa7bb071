// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::category::category_key;
use super::subscriptions::active_only;
use super::{Categorized, Dated, Monetary, accumulate};
use crate::error::MetricsError;
use crate::models::{ExpenseRecord, IncomeRecord, ReceiptRecord, SavingsGoalRecord, Snapshot};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn total_amount<R: Monetary>(records: &[R]) -> Result<Decimal, MetricsError> {
    let mut total = Decimal::ZERO;
    for r in records {
        total = accumulate(total, r.amount()?, r, R::FIELD)?;
    }
    Ok(total)
}

pub fn total_income(income: &[IncomeRecord]) -> Result<Decimal, MetricsError> {
    total_amount(income)
}

pub fn total_expenses(expenses: &[ExpenseRecord]) -> Result<Decimal, MetricsError> {
    total_amount(expenses)
}

/// Income minus expenses. Negative when spending exceeds income.
pub fn net_balance(
    income: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> Result<Decimal, MetricsError> {
    difference(total_income(income)?, total_expenses(expenses)?)
}

fn difference(income: Decimal, expenses: Decimal) -> Result<Decimal, MetricsError> {
    income
        .checked_sub(expenses)
        .ok_or_else(|| MetricsError::overflow("income and expenses", "net_balance"))
}

/// Sum of what has been saved across all goals; a goal without a current
/// amount counts as zero.
pub fn total_savings_balance(goals: &[SavingsGoalRecord]) -> Result<Decimal, MetricsError> {
    total_amount(goals)
}

/// Totals keyed by `YYYY-MM`, oldest month first.
pub fn sum_by_month<R: Monetary + Dated>(
    records: &[R],
) -> Result<BTreeMap<String, Decimal>, MetricsError> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for r in records {
        let amount = r.amount()?;
        let month = map
            .entry(r.date().format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO);
        *month = accumulate(*month, amount, r, R::FIELD)?;
    }
    Ok(map)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceiptStats {
    pub count: usize,
    pub total: Decimal,
    pub average: Decimal,
}

pub fn receipt_stats(receipts: &[ReceiptRecord]) -> Result<ReceiptStats, MetricsError> {
    let total = total_amount(receipts)?;
    let count = receipts.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    };
    Ok(ReceiptStats {
        count,
        total,
        average,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub total_debt: Decimal,
    pub active_subscriptions: usize,
    pub total_savings: Decimal,
    pub receipts: usize,
    pub transactions: usize,
    pub active_features: usize,
}

pub fn dashboard_summary(snap: &Snapshot) -> Result<DashboardSummary, MetricsError> {
    let total_income = total_income(&snap.income)?;
    let total_expenses = total_expenses(&snap.expenses)?;
    let active_features = [
        snap.subscriptions.is_empty(),
        snap.loans.is_empty(),
        snap.savings.is_empty(),
        snap.receipts.is_empty(),
    ]
    .iter()
    .filter(|empty| !**empty)
    .count();
    Ok(DashboardSummary {
        total_income,
        total_expenses,
        net_balance: difference(total_income, total_expenses)?,
        total_debt: total_amount(&snap.loans)?,
        active_subscriptions: active_only(&snap.subscriptions).count(),
        total_savings: total_savings_balance(&snap.savings)?,
        receipts: snap.receipts.len(),
        transactions: snap.income.len() + snap.expenses.len(),
        active_features,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Income,
    Expense,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Income => "income",
            LedgerKind::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub kind: LedgerKind,
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub notes: Option<String>,
}

/// Income and expenses as one list, newest first. Entries on the same day
/// keep income before expenses.
pub fn ledger(
    income: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> Result<Vec<LedgerEntry>, MetricsError> {
    let mut entries = Vec::with_capacity(income.len() + expenses.len());
    for r in income {
        entries.push(LedgerEntry {
            kind: LedgerKind::Income,
            id: r.id,
            date: r.date,
            title: r.source.clone(),
            amount: r.amount()?,
            category: category_key(r.category()).to_string(),
            notes: r.notes.clone(),
        });
    }
    for r in expenses {
        entries.push(LedgerEntry {
            kind: LedgerKind::Expense,
            id: r.id,
            date: r.date,
            title: r.name.clone(),
            amount: r.amount()?,
            category: category_key(r.category()).to_string(),
            notes: r.notes.clone(),
        });
    }
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries)
}

/// Case-insensitive search over title and notes.
pub fn filter_ledger(entries: Vec<LedgerEntry>, query: &str) -> Vec<LedgerEntry> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&q)
                || e
                    .notes
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .collect()
}
