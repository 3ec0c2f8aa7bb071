// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::totals::{LedgerEntry, filter_ledger, ledger};
use crate::models::{Amount, ExpenseRecord, IncomeRecord};
use crate::store::{self, RecordKind};
use crate::utils::{
    Currency, format_amount, get_currency, maybe_print_json, optional_date, optional_text,
    parse_amount, pretty_table, required_arg, resolve_user, today,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

/// `income` and `expense` share one set of subcommands.
pub fn handle(conn: &Connection, kind: RecordKind, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, kind, sub)?,
        Some(("list", sub)) => list(conn, kind, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::delete(conn, kind, &user, id)?;
            println!("Removed {} #{}", kind, id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, kind: RecordKind, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let amount = parse_amount(required_arg(sub, "amount")?)?;
    let date = optional_date(sub, "date")?.unwrap_or_else(today);
    let category = optional_text(sub, "category");
    let notes = optional_text(sub, "notes");

    let (id, title) = match kind {
        RecordKind::Income => {
            let source = required_arg(sub, "source")?.to_string();
            let rec = IncomeRecord {
                id: None,
                user_id: user.clone(),
                amount: Some(Amount::from(amount)),
                date,
                source,
                category,
                notes,
            };
            (store::insert_income(conn, &user, &rec)?, rec.source)
        }
        RecordKind::Expense => {
            let name = required_arg(sub, "name")?.to_string();
            let rec = ExpenseRecord {
                id: None,
                user_id: user.clone(),
                amount: Some(Amount::from(amount)),
                date,
                name,
                category,
                notes,
            };
            (store::insert_expense(conn, &user, &rec)?, rec.name)
        }
        other => return Err(anyhow!("'{}' is not a transaction kind", other)),
    };
    tracing::info!(user = %user, id, kind = %kind, "recorded transaction");
    println!("Recorded {} #{} {} on {} '{}'", kind, id, amount, date, title);
    Ok(())
}

/// Rows of one transaction kind after applying the list filters.
pub fn query_rows(
    conn: &Connection,
    kind: RecordKind,
    user: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<LedgerEntry>> {
    let mut rows = match kind {
        RecordKind::Income => ledger(&store::fetch_income(conn, user)?, &[])?,
        RecordKind::Expense => ledger(&[], &store::fetch_expenses(conn, user)?)?,
        other => return Err(anyhow!("'{}' is not a transaction kind", other)),
    };
    if let Some(month) = sub.get_one::<String>("month") {
        let month = month.trim();
        rows.retain(|r| r.date.format("%Y-%m").to_string() == month);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        rows.retain(|r| r.category.eq_ignore_ascii_case(cat));
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(conn: &Connection, kind: RecordKind, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let data = query_rows(conn, kind, &user, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let title = if kind == RecordKind::Income {
            "Source"
        } else {
            "Name"
        };
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", title, "Amount", "Category", "Notes"],
                entry_rows(&data, ccy, false),
            )
        );
    }
    Ok(())
}

fn entry_rows(data: &[LedgerEntry], ccy: &Currency, with_kind: bool) -> Vec<Vec<String>> {
    data.iter()
        .map(|e| {
            let mut row = vec![
                e.id.map(|i| i.to_string()).unwrap_or_default(),
                e.date.to_string(),
            ];
            if with_kind {
                row.push(e.kind.as_str().to_string());
            }
            row.push(e.title.clone());
            row.push(format_amount(e.amount, ccy));
            row.push(e.category.clone());
            row.push(e.notes.clone().unwrap_or_default());
            row
        })
        .collect()
}

pub fn handle_ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let income = store::fetch_income(conn, &user)?;
    let expenses = store::fetch_expenses(conn, &user)?;
    let mut data = ledger(&income, &expenses)?;
    if let Some(q) = sub.get_one::<String>("search") {
        data = filter_ledger(data, q);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Title", "Amount", "Category", "Notes"],
                entry_rows(&data, ccy, true),
            )
        );
    }
    Ok(())
}
