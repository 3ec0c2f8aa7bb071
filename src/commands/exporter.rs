// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{self, RecordKind};
use crate::utils::{required_arg, resolve_user};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

impl Format {
    fn parse(s: &str) -> Result<Format> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = required_arg(m, "kind")?.parse()?;
    let fmt = Format::parse(m.get_one::<String>("format").map(|s| s.as_str()).unwrap_or("csv"))?;
    let out = Path::new(required_arg(m, "out")?);
    let user = resolve_user(conn, m)?;

    let n = match kind {
        RecordKind::Income => write_rows(&store::fetch_income(conn, &user)?, fmt, out)?,
        RecordKind::Expense => write_rows(&store::fetch_expenses(conn, &user)?, fmt, out)?,
        RecordKind::Loan => write_rows(&store::fetch_loans(conn, &user)?, fmt, out)?,
        RecordKind::Subscription => {
            write_rows(&store::fetch_subscriptions(conn, &user)?, fmt, out)?
        }
        RecordKind::Savings => write_rows(&store::fetch_savings(conn, &user)?, fmt, out)?,
        RecordKind::Receipt => write_rows(&store::fetch_receipts(conn, &user)?, fmt, out)?,
    };
    tracing::info!(user = %user, kind = %kind, rows = n, "export written");
    println!("Exported {} {} rows to {}", n, kind, out.display());
    Ok(())
}

fn write_rows<T: Serialize>(rows: &[T], fmt: Format, out: &Path) -> Result<usize> {
    match fmt {
        Format::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)?;
        }
    }
    Ok(rows.len())
}
