// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user record storage on top of SQLite.
//!
//! Every query is scoped by `user_id`; the caller passes the user in
//! explicitly. Amount columns are handed back as stored text and left to
//! the metrics engine to coerce.

use crate::models::{
    Amount, ExpenseRecord, IncomeRecord, LoanRecord, LoanStatus, ReceiptRecord,
    SavingsGoalRecord, Snapshot, SubscriptionRecord, SubscriptionStatus,
};
use anyhow::{Result, anyhow};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Expense,
    Loan,
    Subscription,
    Savings,
    Receipt,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expenses",
            RecordKind::Loan => "loans",
            RecordKind::Subscription => "subscriptions",
            RecordKind::Savings => "savings",
            RecordKind::Receipt => "receipts",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
            RecordKind::Loan => "loan",
            RecordKind::Subscription => "subscription",
            RecordKind::Savings => "savings goal",
            RecordKind::Receipt => "receipt",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for RecordKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(RecordKind::Income),
            "expense" | "expenses" => Ok(RecordKind::Expense),
            "loan" | "loans" => Ok(RecordKind::Loan),
            "subscription" | "subscriptions" | "sub" => Ok(RecordKind::Subscription),
            "savings" | "saving" | "goal" | "goals" => Ok(RecordKind::Savings),
            "receipt" | "receipts" => Ok(RecordKind::Receipt),
            other => Err(anyhow!("Unknown record kind '{}'", other)),
        }
    }
}

fn amount_col(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Amount>> {
    Ok(r.get::<_, Option<String>>(idx)?.map(Amount::Text))
}

fn amount_param(a: &Option<Amount>) -> Option<String> {
    a.as_ref().map(Amount::raw)
}

pub fn fetch_income(conn: &Connection, user: &str) -> Result<Vec<IncomeRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, amount, date, source, category, notes FROM income
         WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok(IncomeRecord {
            id: Some(r.get(0)?),
            user_id: user.to_string(),
            amount: amount_col(r, 1)?,
            date: r.get(2)?,
            source: r.get(3)?,
            category: r.get(4)?,
            notes: r.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn fetch_expenses(conn: &Connection, user: &str) -> Result<Vec<ExpenseRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, amount, date, name, category, notes FROM expenses
         WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok(ExpenseRecord {
            id: Some(r.get(0)?),
            user_id: user.to_string(),
            amount: amount_col(r, 1)?,
            date: r.get(2)?,
            name: r.get(3)?,
            category: r.get(4)?,
            notes: r.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

const LOAN_COLUMNS: &str = "id, name, initial_amount, current_balance, interest_rate, \
     monthly_payment, start_date, end_date, status, notes";

fn loan_from_row(r: &Row<'_>, user: &str) -> rusqlite::Result<LoanRecord> {
    let status: String = r.get(8)?;
    Ok(LoanRecord {
        id: Some(r.get(0)?),
        user_id: user.to_string(),
        name: r.get(1)?,
        initial_amount: amount_col(r, 2)?,
        current_balance: amount_col(r, 3)?,
        interest_rate: amount_col(r, 4)?,
        monthly_payment: amount_col(r, 5)?,
        start_date: r.get(6)?,
        end_date: r.get(7)?,
        status: status.parse().map_err(|e: anyhow::Error| {
            rusqlite::Error::FromSqlConversionFailure(8, Type::Text, e.into())
        })?,
        notes: r.get(9)?,
    })
}

pub fn fetch_loans(conn: &Connection, user: &str) -> Result<Vec<LoanRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM loans WHERE user_id=?1 ORDER BY id",
        LOAN_COLUMNS
    ))?;
    let rows = stmt.query_map(params![user], |r| loan_from_row(r, user))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn fetch_subscriptions(conn: &Connection, user: &str) -> Result<Vec<SubscriptionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, billing_cycle, next_billing_date, category, status, notes
         FROM subscriptions WHERE user_id=?1 ORDER BY id",
    )?;
    let mut cur = stmt.query(params![user])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        let cycle: String = r.get(3)?;
        let status: String = r.get(6)?;
        data.push(SubscriptionRecord {
            id: Some(r.get(0)?),
            user_id: user.to_string(),
            name: r.get(1)?,
            amount: amount_col(r, 2)?,
            billing_cycle: cycle.into(),
            next_billing_date: r.get(4)?,
            category: r.get(5)?,
            status: status.parse()?,
            notes: r.get(7)?,
        });
    }
    Ok(data)
}

const SAVINGS_COLUMNS: &str =
    "id, name, target_amount, current_amount, deadline, category, notes";

fn savings_from_row(r: &Row<'_>, user: &str) -> rusqlite::Result<SavingsGoalRecord> {
    Ok(SavingsGoalRecord {
        id: Some(r.get(0)?),
        user_id: user.to_string(),
        name: r.get(1)?,
        target_amount: amount_col(r, 2)?,
        current_amount: amount_col(r, 3)?,
        deadline: r.get(4)?,
        category: r.get(5)?,
        notes: r.get(6)?,
    })
}

pub fn fetch_savings(conn: &Connection, user: &str) -> Result<Vec<SavingsGoalRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM savings WHERE user_id=?1 ORDER BY id",
        SAVINGS_COLUMNS
    ))?;
    let rows = stmt.query_map(params![user], |r| savings_from_row(r, user))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn fetch_receipts(conn: &Connection, user: &str) -> Result<Vec<ReceiptRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, merchant, category, date, image_ref, notes
         FROM receipts WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok(ReceiptRecord {
            id: Some(r.get(0)?),
            user_id: user.to_string(),
            name: r.get(1)?,
            amount: amount_col(r, 2)?,
            merchant: r.get(3)?,
            category: r.get(4)?,
            date: r.get(5)?,
            image_ref: r.get(6)?,
            notes: r.get(7)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn fetch_snapshot(conn: &Connection, user: &str) -> Result<Snapshot> {
    let snap = Snapshot {
        income: fetch_income(conn, user)?,
        expenses: fetch_expenses(conn, user)?,
        loans: fetch_loans(conn, user)?,
        subscriptions: fetch_subscriptions(conn, user)?,
        savings: fetch_savings(conn, user)?,
        receipts: fetch_receipts(conn, user)?,
    };
    tracing::debug!(
        user,
        income = snap.income.len(),
        expenses = snap.expenses.len(),
        loans = snap.loans.len(),
        subscriptions = snap.subscriptions.len(),
        savings = snap.savings.len(),
        receipts = snap.receipts.len(),
        "fetched snapshot"
    );
    Ok(snap)
}

pub fn insert_income(conn: &Connection, user: &str, rec: &IncomeRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO income(user_id, amount, date, source, category, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            amount_param(&rec.amount),
            rec.date,
            rec.source,
            rec.category,
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_expense(conn: &Connection, user: &str, rec: &ExpenseRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(user_id, amount, date, name, category, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            amount_param(&rec.amount),
            rec.date,
            rec.name,
            rec.category,
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_loan(conn: &Connection, user: &str, rec: &LoanRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO loans(user_id, name, initial_amount, current_balance, interest_rate,
                           monthly_payment, start_date, end_date, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user,
            rec.name,
            amount_param(&rec.initial_amount),
            amount_param(&rec.current_balance),
            amount_param(&rec.interest_rate),
            amount_param(&rec.monthly_payment),
            rec.start_date,
            rec.end_date,
            rec.status.as_str(),
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_subscription(conn: &Connection, user: &str, rec: &SubscriptionRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO subscriptions(user_id, name, amount, billing_cycle, next_billing_date,
                                   category, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user,
            rec.name,
            amount_param(&rec.amount),
            rec.billing_cycle.as_str(),
            rec.next_billing_date,
            rec.category,
            rec.status.as_str(),
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_savings(conn: &Connection, user: &str, rec: &SavingsGoalRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO savings(user_id, name, target_amount, current_amount, deadline, category, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            rec.name,
            amount_param(&rec.target_amount),
            amount_param(&rec.current_amount),
            rec.deadline,
            rec.category,
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_receipt(conn: &Connection, user: &str, rec: &ReceiptRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO receipts(user_id, name, amount, merchant, category, date, image_ref, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user,
            rec.name,
            amount_param(&rec.amount),
            rec.merchant,
            rec.category,
            rec.date,
            rec.image_ref,
            rec.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_loan(conn: &Connection, user: &str, id: i64) -> Result<LoanRecord> {
    conn.query_row(
        &format!("SELECT {} FROM loans WHERE id=?1 AND user_id=?2", LOAN_COLUMNS),
        params![id, user],
        |r| loan_from_row(r, user),
    )
    .optional()?
    .ok_or_else(|| anyhow!("No loan #{} for user '{}'", id, user))
}

pub fn fetch_savings_goal(conn: &Connection, user: &str, id: i64) -> Result<SavingsGoalRecord> {
    conn.query_row(
        &format!("SELECT {} FROM savings WHERE id=?1 AND user_id=?2", SAVINGS_COLUMNS),
        params![id, user],
        |r| savings_from_row(r, user),
    )
    .optional()?
    .ok_or_else(|| anyhow!("No savings goal #{} for user '{}'", id, user))
}

pub fn update_loan_balance(
    conn: &Connection,
    user: &str,
    id: i64,
    balance: Decimal,
    status: LoanStatus,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE loans SET current_balance=?1, status=?2 WHERE id=?3 AND user_id=?4",
        params![balance.to_string(), status.as_str(), id, user],
    )?;
    if n == 0 {
        return Err(anyhow!("No loan #{} for user '{}'", id, user));
    }
    Ok(())
}

pub fn update_savings_amount(
    conn: &Connection,
    user: &str,
    id: i64,
    amount: Decimal,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE savings SET current_amount=?1 WHERE id=?2 AND user_id=?3",
        params![amount.to_string(), id, user],
    )?;
    if n == 0 {
        return Err(anyhow!("No savings goal #{} for user '{}'", id, user));
    }
    Ok(())
}

pub fn set_subscription_status(
    conn: &Connection,
    user: &str,
    id: i64,
    status: SubscriptionStatus,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE subscriptions SET status=?1 WHERE id=?2 AND user_id=?3",
        params![status.as_str(), id, user],
    )?;
    if n == 0 {
        return Err(anyhow!("No subscription #{} for user '{}'", id, user));
    }
    Ok(())
}

pub fn delete(conn: &Connection, kind: RecordKind, user: &str, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id=?1 AND user_id=?2", kind.table());
    let n = conn.execute(&sql, params![id, user])?;
    if n == 0 {
        return Err(anyhow!("No {} #{} for user '{}'", kind, id, user));
    }
    tracing::info!(user, id, kind = %kind, "deleted record");
    Ok(())
}
