// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::{Monetary, required};
use crate::metrics::loans::{
    apply_payment, loan_progress, payoff_projection, status_after_payment,
};
use crate::models::{Amount, LoanRecord, LoanStatus};
use crate::store::{self, RecordKind};
use crate::utils::{
    format_amount, fmt_percent, get_currency, maybe_print_json, optional_date, optional_text,
    parse_amount, pretty_table, required_arg, resolve_user, today,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::delete(conn, RecordKind::Loan, &user, id)?;
            println!("Removed loan #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let name = required_arg(sub, "name")?.to_string();
    let initial = parse_amount(required_arg(sub, "initial")?)?;
    if initial.is_zero() {
        return Err(anyhow!("Initial amount must be greater than zero"));
    }
    let balance = match sub.get_one::<String>("balance") {
        Some(raw) => parse_amount(raw)?,
        None => initial,
    };
    let rate = sub.get_one::<String>("rate").map(|s| parse_amount(s)).transpose()?;
    let payment = sub
        .get_one::<String>("payment")
        .map(|s| parse_amount(s))
        .transpose()?;
    let rec = LoanRecord {
        id: None,
        user_id: user.clone(),
        name,
        initial_amount: Some(initial.into()),
        current_balance: Some(balance.into()),
        interest_rate: rate.map(Amount::from),
        monthly_payment: payment.map(Amount::from),
        start_date: optional_date(sub, "start")?.unwrap_or_else(today),
        end_date: optional_date(sub, "end")?,
        status: LoanStatus::Active,
        notes: optional_text(sub, "notes"),
    };
    let id = store::insert_loan(conn, &user, &rec)?;
    tracing::info!(user = %user, id, "added loan");
    println!("Added loan #{} '{}' ({} outstanding)", id, rec.name, balance);
    Ok(())
}

#[derive(Serialize)]
pub struct LoanRow {
    pub id: Option<i64>,
    pub name: String,
    pub status: LoanStatus,
    pub initial_amount: Decimal,
    pub current_balance: Decimal,
    pub amount_paid: Decimal,
    pub progress_percent: Decimal,
    pub months_remaining: Option<u32>,
    pub payoff_date: Option<chrono::NaiveDate>,
}

pub fn loan_rows(loans: &[LoanRecord], today: chrono::NaiveDate) -> Result<Vec<LoanRow>> {
    let mut rows = Vec::with_capacity(loans.len());
    for loan in loans {
        let progress = loan_progress(loan)?;
        let projection = payoff_projection(loan, today)?;
        let balance = loan.amount()?;
        rows.push(LoanRow {
            id: loan.id,
            name: loan.name.clone(),
            status: loan.status,
            initial_amount: required(loan, "initial_amount", loan.initial_amount.as_ref())?,
            current_balance: balance,
            amount_paid: progress.amount_paid,
            progress_percent: progress.progress_percent,
            months_remaining: projection.months_remaining,
            payoff_date: projection.payoff_date,
        });
    }
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let loans = store::fetch_loans(conn, &user)?;
    let data = loan_rows(&loans, today())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.map(|i| i.to_string()).unwrap_or_default(),
                    r.name.clone(),
                    r.status.as_str().to_string(),
                    format_amount(r.current_balance, ccy),
                    format_amount(r.initial_amount, ccy),
                    fmt_percent(r.progress_percent),
                    r.months_remaining
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "-".into()),
                    r.payoff_date
                        .map(|d| d.format("%b %Y").to_string())
                        .unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Status", "Balance", "Initial", "Progress", "Months", "Payoff"],
                rows
            )
        );
    }
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").context("Missing --id")?;
    let payment = parse_amount(required_arg(sub, "amount")?)?;
    let loan = store::fetch_loan(conn, &user, id)?;
    let balance = loan.amount()?;
    let new_balance = apply_payment(balance, payment);
    let status = status_after_payment(loan.status, new_balance);
    store::update_loan_balance(conn, &user, id, new_balance, status)?;
    if payment > balance {
        tracing::warn!(id, %payment, %balance, "payment exceeds balance, clamped to zero");
    }
    let ccy = get_currency(conn)?;
    println!(
        "Paid {} on '{}': balance {} -> {} ({})",
        format_amount(payment, ccy),
        loan.name,
        format_amount(balance, ccy),
        format_amount(new_balance, ccy),
        status.as_str()
    );
    Ok(())
}
