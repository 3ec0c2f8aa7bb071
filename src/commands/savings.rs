// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::category::category_key;
use crate::metrics::savings::{apply_contribution, goal_progress};
use crate::metrics::{Monetary, or_zero};
use crate::models::{Amount, SavingsGoalRecord};
use crate::store::{self, RecordKind};
use crate::utils::{
    clamp_percent, format_amount, fmt_percent, get_currency, maybe_print_json, optional_date,
    optional_text, parse_amount, pretty_table, required_arg, resolve_user,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::delete(conn, RecordKind::Savings, &user, id)?;
            println!("Removed savings goal #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let target = parse_amount(required_arg(sub, "target")?)?;
    if target.is_zero() {
        return Err(anyhow!("Target amount must be greater than zero"));
    }
    let current = match sub.get_one::<String>("current") {
        Some(raw) => parse_amount(raw)?,
        None => Decimal::ZERO,
    };
    let rec = SavingsGoalRecord {
        id: None,
        user_id: user.clone(),
        name: required_arg(sub, "name")?.to_string(),
        target_amount: Some(Amount::from(target)),
        current_amount: Some(Amount::from(current)),
        deadline: optional_date(sub, "deadline")?,
        category: optional_text(sub, "category"),
        notes: optional_text(sub, "notes"),
    };
    let id = store::insert_savings(conn, &user, &rec)?;
    tracing::info!(user = %user, id, "added savings goal");
    println!("Added savings goal #{} '{}' (target {})", id, rec.name, target);
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: Option<i64>,
    pub name: String,
    pub current_amount: Decimal,
    pub target_amount: Decimal,
    pub progress_percent: Decimal,
    pub deadline: Option<chrono::NaiveDate>,
    pub category: String,
}

pub fn goal_rows(goals: &[SavingsGoalRecord]) -> Result<Vec<GoalRow>> {
    let mut rows = Vec::with_capacity(goals.len());
    for g in goals {
        rows.push(GoalRow {
            id: g.id,
            name: g.name.clone(),
            current_amount: g.amount()?,
            target_amount: or_zero(g, "target_amount", g.target_amount.as_ref())?,
            progress_percent: goal_progress(g)?,
            deadline: g.deadline,
            category: category_key(g.category.as_deref()).to_string(),
        });
    }
    Ok(rows)
}

/// Ten-cell text bar; full once the goal is reached.
fn progress_bar(percent: Decimal) -> String {
    let filled = (clamp_percent(percent) / Decimal::TEN)
        .floor()
        .to_usize()
        .unwrap_or(0);
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let goals = store::fetch_savings(conn, &user)?;
    let data = goal_rows(&goals)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.map(|i| i.to_string()).unwrap_or_default(),
                    r.name.clone(),
                    format_amount(r.current_amount, ccy),
                    format_amount(r.target_amount, ccy),
                    format!(
                        "{} {}",
                        progress_bar(r.progress_percent),
                        fmt_percent(r.progress_percent)
                    ),
                    r.deadline.map(|d| d.to_string()).unwrap_or_default(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Saved", "Target", "Progress", "Deadline", "Category"],
                rows
            )
        );
    }
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").context("Missing --id")?;
    let contribution = parse_amount(required_arg(sub, "amount")?)?;
    let goal = store::fetch_savings_goal(conn, &user, id)?;
    let current = goal.amount()?;
    let new_amount = apply_contribution(current, contribution)
        .with_context(|| format!("Contribution to savings goal #{} is too large", id))?;
    store::update_savings_amount(conn, &user, id, new_amount)?;
    let ccy = get_currency(conn)?;
    println!(
        "Added {} to '{}': saved {} -> {}",
        format_amount(contribution, ccy),
        goal.name,
        format_amount(current, ccy),
        format_amount(new_amount, ccy)
    );
    Ok(())
}
