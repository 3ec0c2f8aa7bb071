// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use tallywise::store::RecordKind;
use tallywise::{cli, commands::transactions, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (i, cat) in [(1, "Food"), (2, ""), (3, "Food")] {
        conn.execute(
            "INSERT INTO expenses(user_id, amount, date, name, category) VALUES ('default', '-10', ?1, 'P', ?2)",
            params![format!("2025-01-0{}", i), cat],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO expenses(user_id, amount, date, name) VALUES ('other', '5', '2025-01-09', 'Q')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["tallywise", "expense", "list", "--limit", "2"]);
    if let Some(("expense", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, RecordKind::Expense, "default", list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no expense subcommand");
    }
}

#[test]
fn list_filters_by_category_bucket() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallywise", "expense", "list", "--category", "uncategorized",
    ]);
    if let Some(("expense", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, RecordKind::Expense, "default", list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].date.to_string(), "2025-01-02");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no expense subcommand");
    }
}

#[test]
fn add_income_respects_user_flag() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallywise", "--user", "erin", "income", "add", "--amount", "1200", "--source", "Salary",
        "--date", "2025-02-01",
    ]);
    if let Some(("income", inc_m)) = matches.subcommand() {
        transactions::handle(&conn, RecordKind::Income, inc_m).unwrap();
    } else {
        panic!("no income subcommand");
    }
    let rows = store::fetch_income(&conn, "erin").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "Salary");
    assert!(store::fetch_income(&conn, "default").unwrap().is_empty());
}

#[test]
fn add_rejects_negative_amount() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tallywise", "income", "add", "--amount=-5", "--source", "Oops",
    ]);
    if let Some(("income", inc_m)) = matches.subcommand() {
        assert!(transactions::handle(&conn, RecordKind::Income, inc_m).is_err());
    } else {
        panic!("no income subcommand");
    }
}
