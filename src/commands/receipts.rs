// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::Monetary;
use crate::metrics::category::category_key;
use crate::models::{Amount, ReceiptRecord};
use crate::store::{self, RecordKind};
use crate::utils::{
    format_amount, get_currency, maybe_print_json, optional_date, optional_text, parse_amount,
    pretty_table, required_arg, resolve_user, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            store::delete(conn, RecordKind::Receipt, &user, id)?;
            println!("Removed receipt #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let amount = parse_amount(required_arg(sub, "amount")?)?;
    let rec = ReceiptRecord {
        id: None,
        user_id: user.clone(),
        name: required_arg(sub, "name")?.to_string(),
        amount: Some(Amount::from(amount)),
        merchant: optional_text(sub, "merchant"),
        category: optional_text(sub, "category"),
        date: optional_date(sub, "date")?.unwrap_or_else(today),
        image_ref: optional_text(sub, "image"),
        notes: optional_text(sub, "notes"),
    };
    let id = store::insert_receipt(conn, &user, &rec)?;
    tracing::info!(user = %user, id, "added receipt");
    println!("Added receipt #{} '{}' {} on {}", id, rec.name, amount, rec.date);
    Ok(())
}

#[derive(Serialize)]
pub struct ReceiptRow {
    pub id: Option<i64>,
    pub date: chrono::NaiveDate,
    pub name: String,
    pub merchant: String,
    pub amount: Decimal,
    pub category: String,
    pub image_ref: Option<String>,
}

pub fn query_rows(
    conn: &Connection,
    user: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<ReceiptRow>> {
    let month = sub.get_one::<String>("month").map(|s| s.trim().to_string());
    let cat = sub.get_one::<String>("category").map(|s| s.trim().to_string());
    let mut data = Vec::new();
    for r in store::fetch_receipts(conn, user)? {
        let category = category_key(r.category.as_deref()).to_string();
        if let Some(ref m) = month {
            if r.date.format("%Y-%m").to_string() != *m {
                continue;
            }
        }
        if let Some(ref c) = cat {
            if !category.eq_ignore_ascii_case(c) {
                continue;
            }
        }
        data.push(ReceiptRow {
            id: r.id,
            date: r.date,
            amount: r.amount()?,
            name: r.name,
            merchant: r.merchant.unwrap_or_default(),
            category,
            image_ref: r.image_ref,
        });
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let data = query_rows(conn, &user, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.map(|i| i.to_string()).unwrap_or_default(),
                    r.date.to_string(),
                    r.name.clone(),
                    r.merchant.clone(),
                    format_amount(r.amount, ccy),
                    r.category.clone(),
                    r.image_ref.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Name", "Merchant", "Amount", "Category", "Image"],
                rows
            )
        );
    }
    Ok(())
}
