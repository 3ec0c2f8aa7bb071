// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_active_user, get_currency, required_arg, set_active_user, set_currency};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let ccy = get_currency(conn)?;
            println!("user:     {}", get_active_user(conn)?);
            println!("currency: {} ({} {})", ccy.code, ccy.symbol, ccy.name);
        }
        Some(("set-currency", sub)) => {
            let ccy = set_currency(conn, required_arg(sub, "code")?)?;
            tracing::info!(currency = ccy.code, "currency updated");
            println!("Currency set to {} ({})", ccy.code, ccy.symbol);
        }
        Some(("set-user", sub)) => {
            let user = required_arg(sub, "id")?;
            set_active_user(conn, user)?;
            println!("Active user set to '{}'", user);
        }
        _ => {}
    }
    Ok(())
}
