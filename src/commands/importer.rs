// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::MetricsError;
use crate::metrics::loans::{average_interest_rate, loan_progress, total_monthly_payments};
use crate::metrics::savings::{goal_progress, total_savings_target};
use crate::metrics::subscriptions::subscription_costs;
use crate::metrics::totals::total_amount;
use crate::models::{
    ExpenseRecord, IncomeRecord, LoanRecord, ReceiptRecord, SavingsGoalRecord, SubscriptionRecord,
};
use crate::store::{self, RecordKind};
use crate::utils::{required_arg, resolve_user};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use std::fs;

/// Records that can be handed to a new owner before insert.
trait Owned {
    fn set_owner(&mut self, user: &str);
}

macro_rules! owned {
    ($($t:ty),*) => {
        $(impl Owned for $t {
            fn set_owner(&mut self, user: &str) {
                self.id = None;
                self.user_id = user.to_string();
            }
        })*
    };
}

owned!(
    IncomeRecord,
    ExpenseRecord,
    LoanRecord,
    SubscriptionRecord,
    SavingsGoalRecord,
    ReceiptRecord
);

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = required_arg(m, "kind")?.parse()?;
    let path = required_arg(m, "path")?;
    let user = resolve_user(conn, m)?;
    let n = match kind {
        RecordKind::Income => {
            import_rows(conn, &user, path, total_amount::<IncomeRecord>, store::insert_income)?
        }
        RecordKind::Expense => {
            import_rows(conn, &user, path, total_amount::<ExpenseRecord>, store::insert_expense)?
        }
        RecordKind::Receipt => {
            import_rows(conn, &user, path, total_amount::<ReceiptRecord>, store::insert_receipt)?
        }
        RecordKind::Subscription => import_rows(
            conn,
            &user,
            path,
            |rows: &[SubscriptionRecord]| {
                // Coerce cancelled rows too, not only the ones the totals count.
                total_amount(rows)?;
                subscription_costs(rows)
            },
            store::insert_subscription,
        )?,
        RecordKind::Savings => import_rows(
            conn,
            &user,
            path,
            |rows: &[SavingsGoalRecord]| {
                for g in rows {
                    goal_progress(g)?;
                }
                total_savings_target(rows)
            },
            store::insert_savings,
        )?,
        RecordKind::Loan => import_rows(
            conn,
            &user,
            path,
            |rows: &[LoanRecord]| {
                for l in rows {
                    loan_progress(l)?;
                }
                total_monthly_payments(rows)?;
                average_interest_rate(rows)
            },
            store::insert_loan,
        )?,
    };
    println!("Imported {} {} rows from {}", n, kind, path);
    Ok(())
}

fn import_rows<T, V, O, I>(
    conn: &mut Connection,
    user: &str,
    path: &str,
    validate: V,
    insert: I,
) -> Result<usize>
where
    T: DeserializeOwned + Owned,
    V: Fn(&[T]) -> Result<O, MetricsError>,
    I: Fn(&Connection, &str, &T) -> Result<i64>,
{
    let raw = fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
    let mut rows: Vec<T> =
        serde_json::from_str(&raw).with_context(|| format!("Parse JSON {}", path))?;
    validate(&rows).with_context(|| format!("Rejected {}, nothing imported", path))?;

    for row in rows.iter_mut() {
        row.set_owner(user);
    }

    let tx = conn.transaction()?;
    for row in &rows {
        insert(&*tx, user, row)?;
    }
    tx.commit()?;
    tracing::info!(user, path, rows = rows.len(), "import committed");
    Ok(rows.len())
}
