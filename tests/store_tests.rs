// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tallywise::db;
use tallywise::metrics::totals::total_income;
use tallywise::models::{Amount, IncomeRecord, LoanStatus, SubscriptionStatus};
use tallywise::store::{self, RecordKind};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (user, amount) in [("alice", "100"), ("alice", "250.50"), ("bob", "9999")] {
        conn.execute(
            "INSERT INTO income(user_id, amount, date, source) VALUES (?1, ?2, '2025-01-10', 'Job')",
            params![user, amount],
        )
        .unwrap();
    }
    conn
}

#[test]
fn reads_are_scoped_to_one_user() {
    let conn = setup();
    let alice = store::fetch_income(&conn, "alice").unwrap();
    assert_eq!(alice.len(), 2);
    assert!(alice.iter().all(|r| r.user_id == "alice"));
    assert_eq!(total_income(&alice).unwrap(), "350.50".parse::<Decimal>().unwrap());
    assert!(store::fetch_income(&conn, "carol").unwrap().is_empty());
}

#[test]
fn stored_text_survives_until_coerced() {
    let conn = setup();
    conn.execute(
        "INSERT INTO income(user_id, amount, date, source) VALUES ('dave', 'n/a', '2025-01-10', 'Gift')",
        [],
    )
    .unwrap();
    let rows = store::fetch_income(&conn, "dave").unwrap();
    assert_eq!(rows[0].amount, Some(Amount::from("n/a")));
    assert!(total_income(&rows).is_err());
}

#[test]
fn insert_uses_the_given_owner() {
    let conn = setup();
    let rec = IncomeRecord {
        id: None,
        user_id: "someone-else".into(),
        amount: Some(Amount::from("12")),
        date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        source: "Refund".into(),
        category: None,
        notes: None,
    };
    let id = store::insert_income(&conn, "bob", &rec).unwrap();
    let bob = store::fetch_income(&conn, "bob").unwrap();
    assert!(bob.iter().any(|r| r.id == Some(id)));
    assert!(store::fetch_income(&conn, "someone-else").unwrap().is_empty());
}

#[test]
fn delete_refuses_other_users_rows() {
    let conn = setup();
    let bob_id = store::fetch_income(&conn, "bob").unwrap()[0].id.unwrap();
    assert!(store::delete(&conn, RecordKind::Income, "alice", bob_id).is_err());
    store::delete(&conn, RecordKind::Income, "bob", bob_id).unwrap();
    assert!(store::fetch_income(&conn, "bob").unwrap().is_empty());
}

#[test]
fn unknown_subscription_is_an_error() {
    let conn = setup();
    let res = store::set_subscription_status(&conn, "alice", 42, SubscriptionStatus::Cancelled);
    assert!(res.is_err());
}

#[test]
fn record_kind_accepts_plurals() {
    assert_eq!("Expenses".parse::<RecordKind>().unwrap(), RecordKind::Expense);
    assert_eq!("goals".parse::<RecordKind>().unwrap(), RecordKind::Savings);
    assert!("budgets".parse::<RecordKind>().is_err());
}

#[test]
fn single_loan_lookup_is_scoped_to_owner() {
    let conn = setup();
    conn.execute(
        "INSERT INTO loans(user_id, name, initial_amount, current_balance, start_date, status)
         VALUES ('alice', 'Car', '5000', '3200', '2024-01-01', 'defaulted')",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    let car = store::fetch_loan(&conn, "alice", id).unwrap();
    assert_eq!(car.name, "Car");
    assert_eq!(car.status, LoanStatus::Defaulted);
    assert_eq!(car.current_balance, Some(Amount::from("3200")));

    let err = store::fetch_loan(&conn, "bob", id).unwrap_err();
    assert!(err.to_string().contains("No loan"));
    assert!(store::fetch_loan(&conn, "alice", id + 1).is_err());
}
