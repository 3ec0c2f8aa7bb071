// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tallywise::metrics::subscriptions::subscription_costs;
use tallywise::metrics::totals::total_expenses;
use tallywise::{cli, commands::importer, db, store};
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn json_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file
}

fn run_import(conn: &mut Connection, kind: &str, path: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(["tallywise", "import", kind, "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_accepts_numbers_and_strings() {
    let mut conn = base_conn();
    let file = json_file(
        r#"[
            {"id": 77, "user_id": "uuid-from-backend", "amount": 12.5, "date": "2025-01-02",
             "name": "Lunch", "category": "Food", "notes": null},
            {"amount": "7.25", "date": "2025-01-03", "name": "Bus", "category": null, "notes": null}
        ]"#,
    );
    run_import(&mut conn, "expenses", &file.path().to_string_lossy()).unwrap();

    let rows = store::fetch_expenses(&conn, "default").unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.user_id == "default"));
    assert!(rows.iter().all(|r| r.id != Some(77)));
    assert_eq!(total_expenses(&rows).unwrap(), "19.75".parse::<Decimal>().unwrap());
    assert!(store::fetch_expenses(&conn, "uuid-from-backend").unwrap().is_empty());
}

#[test]
fn import_is_all_or_nothing() {
    let mut conn = base_conn();
    let file = json_file(
        r#"[
            {"amount": "10", "date": "2025-01-02", "name": "Fine", "category": null, "notes": null},
            {"amount": "ten", "date": "2025-01-03", "name": "Broken", "category": null, "notes": null}
        ]"#,
    );
    let err = run_import(&mut conn, "expense", &file.path().to_string_lossy()).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid amount 'ten' on expense 'Broken'"));
    assert!(store::fetch_expenses(&conn, "default").unwrap().is_empty());
}

#[test]
fn import_subscriptions_with_unknown_cycle() {
    let mut conn = base_conn();
    let file = json_file(
        r#"[
            {"name": "Cloud", "amount": 120, "billing_cycle": "Yearly", "next_billing_date": null,
             "category": "Tech", "status": "active", "notes": null},
            {"name": "Paper", "amount": "8", "billing_cycle": "Fortnightly", "next_billing_date": "2025-03-01",
             "category": null, "status": "active", "notes": null},
            {"name": "Gym", "amount": "40", "billing_cycle": "Monthly", "next_billing_date": null,
             "category": null, "status": "cancelled", "notes": null}
        ]"#,
    );
    run_import(&mut conn, "subscriptions", &file.path().to_string_lossy()).unwrap();

    let subs = store::fetch_subscriptions(&conn, "default").unwrap();
    assert_eq!(subs.len(), 3);
    let costs = subscription_costs(&subs).unwrap();
    assert_eq!(costs.active_count, 2);
    assert_eq!(costs.total_monthly, "18".parse::<Decimal>().unwrap());
}

#[test]
fn import_rejects_malformed_json() {
    let mut conn = base_conn();
    let file = json_file(r#"{"not": "an array"}"#);
    assert!(run_import(&mut conn, "income", &file.path().to_string_lossy()).is_err());
}
