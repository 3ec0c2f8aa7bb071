// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use tallywise::store::RecordKind;
use tallywise::{cli, commands, db};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TALLYWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<String>("db").map(Path::new);
    let mut conn = db::open_or_init(db_arg)?;

    match matches.subcommand() {
        Some(("init", _)) => match db_arg {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("income", sub)) => commands::transactions::handle(&conn, RecordKind::Income, sub)?,
        Some(("expense", sub)) => commands::transactions::handle(&conn, RecordKind::Expense, sub)?,
        Some(("ledger", sub)) => commands::transactions::handle_ledger(&conn, sub)?,
        Some(("loan", sub)) => commands::loans::handle(&conn, sub)?,
        Some(("sub", sub)) => commands::subscriptions::handle(&conn, sub)?,
        Some(("savings", sub)) => commands::savings::handle(&conn, sub)?,
        Some(("receipt", sub)) => commands::receipts::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
