// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::Monetary;
use crate::metrics::category::category_key;
use crate::metrics::subscriptions::{monthly_cost, subscription_costs};
use crate::models::{Amount, BillingCycle, SubscriptionRecord, SubscriptionStatus};
use crate::store::{self, RecordKind};
use crate::utils::{
    format_amount, get_currency, maybe_print_json, optional_date, optional_text, parse_amount,
    pretty_table, required_arg, resolve_user,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("cancel", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::set_subscription_status(conn, &user, id, SubscriptionStatus::Cancelled)?;
            println!("Cancelled subscription #{}", id);
        }
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::delete(conn, RecordKind::Subscription, &user, id)?;
            println!("Removed subscription #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let amount = parse_amount(required_arg(sub, "amount")?)?;
    let cycle = BillingCycle::parse(required_arg(sub, "cycle")?);
    if let BillingCycle::Other(ref c) = cycle {
        tracing::warn!(cycle = %c, "unrecognized billing cycle, it will be counted as monthly");
    }
    let rec = SubscriptionRecord {
        id: None,
        user_id: user.clone(),
        name: required_arg(sub, "name")?.to_string(),
        amount: Some(Amount::from(amount)),
        billing_cycle: cycle,
        next_billing_date: optional_date(sub, "next")?,
        category: optional_text(sub, "category"),
        status: SubscriptionStatus::Active,
        notes: optional_text(sub, "notes"),
    };
    let id = store::insert_subscription(conn, &user, &rec)?;
    tracing::info!(user = %user, id, "added subscription");
    println!(
        "Added subscription #{} '{}' {} {}",
        id, rec.name, amount, rec.billing_cycle
    );
    Ok(())
}

#[derive(Serialize)]
pub struct SubscriptionRow {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub billing_cycle: String,
    pub monthly_cost: Decimal,
    pub next_billing_date: Option<chrono::NaiveDate>,
    pub category: String,
    pub status: SubscriptionStatus,
}

pub fn subscription_rows(subs: &[SubscriptionRecord]) -> Result<Vec<SubscriptionRow>> {
    let mut rows = Vec::with_capacity(subs.len());
    for s in subs {
        rows.push(SubscriptionRow {
            id: s.id,
            name: s.name.clone(),
            amount: s.amount()?,
            billing_cycle: s.billing_cycle.to_string(),
            monthly_cost: monthly_cost(s)?,
            next_billing_date: s.next_billing_date,
            category: category_key(s.category.as_deref()).to_string(),
            status: s.status,
        });
    }
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let subs = store::fetch_subscriptions(conn, &user)?;
    let data = subscription_rows(&subs)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.map(|i| i.to_string()).unwrap_or_default(),
                    r.name.clone(),
                    format_amount(r.amount, ccy),
                    r.billing_cycle.clone(),
                    format_amount(r.monthly_cost, ccy),
                    r.next_billing_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "Not set".into()),
                    r.category.clone(),
                    r.status.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Cycle", "Monthly", "Next billing", "Category", "Status"],
                rows
            )
        );
        let costs = subscription_costs(&subs)?;
        println!(
            "{} active: {} / month, {} / year",
            costs.active_count,
            format_amount(costs.total_monthly, ccy),
            format_amount(costs.total_yearly, ccy)
        );
    }
    Ok(())
}
