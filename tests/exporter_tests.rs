// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use tallywise::{cli, commands::exporter, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO receipts(user_id, name, amount, merchant, category, date, image_ref, notes) VALUES \
        ('default', 'Weekly run', '12.34', 'Corner Shop', 'Groceries', '2025-01-02', NULL, NULL)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO receipts(user_id, name, amount, date) VALUES ('other', 'Hidden', '1', '2025-01-03')",
        [],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, fmt: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "tallywise", "export", "receipts", "--format", fmt, "--out", out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_receipts_as_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("receipts.json");
    run_export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "user_id": "default",
                "name": "Weekly run",
                "amount": "12.34",
                "merchant": "Corner Shop",
                "category": "Groceries",
                "date": "2025-01-02",
                "image_ref": null,
                "notes": null
            }
        ])
    );
}

#[test]
fn export_receipts_as_csv() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("receipts.csv");
    run_export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(2), Some("name"));
    assert_eq!(headers.get(3), Some("amount"));
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get(3), Some("12.34"));
    assert_eq!(records[0].get(6), Some("2025-01-02"));
}

#[test]
fn export_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("receipts.xml");
    assert!(run_export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
