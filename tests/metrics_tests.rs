// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallywise::error::MetricsError;
use tallywise::metrics::UNCATEGORIZED;
use tallywise::metrics::category::{breakdown_by_category, sorted_by_total, sum_by_category};
use tallywise::metrics::totals::{
    dashboard_summary, filter_ledger, ledger, net_balance, receipt_stats, sum_by_month,
    total_expenses, total_income, LedgerKind,
};
use tallywise::models::{
    Amount, BillingCycle, ExpenseRecord, IncomeRecord, LoanRecord, LoanStatus, ReceiptRecord,
    SavingsGoalRecord, Snapshot, SubscriptionRecord, SubscriptionStatus,
};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn income(id: i64, amount: &str, day: &str, source: &str, category: Option<&str>) -> IncomeRecord {
    IncomeRecord {
        id: Some(id),
        user_id: "u1".into(),
        amount: Some(Amount::from(amount)),
        date: date(day),
        source: source.into(),
        category: category.map(String::from),
        notes: None,
    }
}

fn expense(id: i64, amount: &str, day: &str, name: &str, category: Option<&str>) -> ExpenseRecord {
    ExpenseRecord {
        id: Some(id),
        user_id: "u1".into(),
        amount: Some(Amount::from(amount)),
        date: date(day),
        name: name.into(),
        category: category.map(String::from),
        notes: None,
    }
}

fn receipt(id: i64, amount: &str, category: Option<&str>) -> ReceiptRecord {
    ReceiptRecord {
        id: Some(id),
        user_id: "u1".into(),
        name: format!("Receipt {}", id),
        amount: Some(Amount::from(amount)),
        merchant: None,
        category: category.map(String::from),
        date: date("2025-03-01"),
        image_ref: None,
        notes: None,
    }
}

#[test]
fn category_sums_conserve_the_total() {
    let expenses = vec![
        expense(1, "12.50", "2025-01-02", "Lunch", Some("Food")),
        expense(2, "40", "2025-01-03", "Groceries", Some("Food")),
        expense(3, "100.25", "2025-01-04", "Power", Some("Utilities")),
        expense(4, "9.99", "2025-01-05", "Misc", None),
    ];
    let by_cat = sum_by_category(&expenses).unwrap();
    let sum: Decimal = by_cat.values().copied().sum();
    assert_eq!(sum, total_expenses(&expenses).unwrap());
    assert_eq!(by_cat["Food"], d("52.50"));
    assert_eq!(by_cat["Utilities"], d("100.25"));
}

#[test]
fn blank_categories_fall_into_uncategorized_only() {
    let expenses = vec![
        expense(1, "5", "2025-01-01", "a", None),
        expense(2, "7", "2025-01-01", "b", Some("")),
        expense(3, "11", "2025-01-01", "c", Some("   ")),
        expense(4, "13", "2025-01-01", "d", Some("Travel")),
    ];
    let by_cat = breakdown_by_category(&expenses).unwrap();
    assert_eq!(by_cat.len(), 2);
    assert_eq!(by_cat[UNCATEGORIZED].count, 3);
    assert_eq!(by_cat[UNCATEGORIZED].total, d("23"));
    assert!(!by_cat.contains_key(""));
}

#[test]
fn sorted_by_total_puts_largest_first_and_breaks_ties_by_name() {
    let expenses = vec![
        expense(1, "10", "2025-01-01", "a", Some("Books")),
        expense(2, "30", "2025-01-01", "b", Some("Rent")),
        expense(3, "10", "2025-01-01", "c", Some("Apps")),
    ];
    let sorted = sorted_by_total(sum_by_category(&expenses).unwrap());
    let names: Vec<&str> = sorted.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Apps", "Books"]);
}

#[test]
fn net_balance_is_income_minus_expenses() {
    let inc = vec![
        income(1, "3000", "2025-01-01", "Salary", Some("Job")),
        income(2, "250.75", "2025-01-15", "Freelance", None),
    ];
    let exp = vec![
        expense(1, "1200", "2025-01-03", "Rent", Some("Housing")),
        expense(2, "4000", "2025-01-20", "Car", None),
    ];
    let net = net_balance(&inc, &exp).unwrap();
    assert_eq!(net, total_income(&inc).unwrap() - total_expenses(&exp).unwrap());
    assert_eq!(net, d("-1949.25"));
    assert_eq!(net_balance(&[], &[]).unwrap(), Decimal::ZERO);
}

#[test]
fn non_numeric_amount_names_record_and_field() {
    let mut bad = income(3, "0", "2025-01-01", "Salary", None);
    bad.amount = Some(Amount::from("abc"));
    let err = total_income(&[bad]).unwrap_err();
    assert_eq!(
        err,
        MetricsError::InvalidAmount {
            record: "income #3 'Salary'".into(),
            field: "amount",
            value: "abc".into(),
        }
    );
    assert_eq!(err.to_string(), "Invalid amount 'abc' on income #3 'Salary'");
}

#[test]
fn missing_required_amount_is_reported() {
    let mut blank = expense(8, "0", "2025-01-01", "Coffee", None);
    blank.amount = None;
    assert_eq!(
        total_expenses(&[blank]).unwrap_err(),
        MetricsError::MissingAmount {
            record: "expense #8 'Coffee'".into(),
            field: "amount",
        }
    );
}

#[test]
fn numeric_and_text_amounts_agree() {
    let mut a = income(1, "0", "2025-01-01", "A", None);
    a.amount = Some(Amount::from(d("19.99")));
    let b = income(2, " 19.99 ", "2025-01-01", "B", None);
    assert_eq!(total_income(&[a]).unwrap(), total_income(&[b]).unwrap());
}

#[test]
fn aggregators_are_idempotent() {
    let exp = vec![
        expense(1, "12.345", "2025-01-02", "x", Some("Food")),
        expense(2, "0.005", "2025-02-02", "y", None),
    ];
    assert_eq!(sum_by_category(&exp).unwrap(), sum_by_category(&exp).unwrap());
    assert_eq!(sum_by_month(&exp).unwrap(), sum_by_month(&exp).unwrap());
    assert_eq!(total_expenses(&exp).unwrap(), total_expenses(&exp).unwrap());
}

#[test]
fn income_by_month_is_ordered_oldest_first() {
    let inc = vec![
        income(1, "100", "2025-02-10", "a", None),
        income(2, "50", "2024-12-31", "b", None),
        income(3, "25", "2025-02-01", "c", None),
    ];
    let months: Vec<(String, Decimal)> = sum_by_month(&inc).unwrap().into_iter().collect();
    assert_eq!(
        months,
        vec![("2024-12".to_string(), d("50")), ("2025-02".to_string(), d("125"))]
    );
}

#[test]
fn receipt_stats_average_and_empty() {
    let receipts = vec![
        receipt(1, "10", Some("Food")),
        receipt(2, "20", None),
        receipt(3, "33", Some("Food")),
    ];
    let stats = receipt_stats(&receipts).unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.total, d("63"));
    assert_eq!(stats.average, d("21"));

    let empty = receipt_stats(&[]).unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.average, Decimal::ZERO);
}

#[test]
fn ledger_is_newest_first_and_searchable() {
    let mut inc = income(1, "500", "2025-01-05", "Salary", None);
    inc.notes = Some("January pay".into());
    let exp = vec![
        expense(1, "20", "2025-01-07", "Cinema", Some("Fun")),
        expense(2, "8", "2025-01-01", "Coffee beans", None),
    ];
    let entries = ledger(&[inc], &exp).unwrap();
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Cinema", "Salary", "Coffee beans"]);
    assert_eq!(entries[1].kind, LedgerKind::Income);

    let hits = filter_ledger(entries.clone(), "JANUARY");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Salary");
    assert_eq!(filter_ledger(entries, "  ").len(), 3);
}

#[test]
fn dashboard_counts_features_and_debt() {
    let snap = Snapshot {
        income: vec![income(1, "1000", "2025-01-01", "Job", None)],
        expenses: vec![expense(1, "400", "2025-01-02", "Rent", None)],
        loans: vec![LoanRecord {
            id: Some(1),
            user_id: "u1".into(),
            name: "Car".into(),
            initial_amount: Some(Amount::from("5000")),
            current_balance: Some(Amount::from("3200")),
            interest_rate: None,
            monthly_payment: None,
            start_date: date("2024-01-01"),
            end_date: None,
            status: LoanStatus::Active,
            notes: None,
        }],
        receipts: vec![receipt(1, "12", None)],
        ..Snapshot::default()
    };
    let summary = dashboard_summary(&snap).unwrap();
    assert_eq!(summary.net_balance, d("600"));
    assert_eq!(summary.total_debt, d("3200"));
    assert_eq!(summary.transactions, 2);
    assert_eq!(summary.receipts, 1);
    assert_eq!(summary.active_subscriptions, 0);
    assert_eq!(summary.active_features, 2);
}

#[test]
fn income_sum_past_decimal_range_is_an_error() {
    let two_months = vec![
        income(1, "5e28", "2025-01-01", "Job", None),
        income(2, "5e28", "2025-02-01", "Bonus", None),
    ];
    let overflow = MetricsError::Overflow {
        record: "income #2 'Bonus'".into(),
        field: "amount",
    };
    assert_eq!(total_income(&two_months).unwrap_err(), overflow);
    assert_eq!(sum_by_category(&two_months).unwrap_err(), overflow);
    assert_eq!(breakdown_by_category(&two_months).unwrap_err(), overflow);
    assert!(sum_by_month(&two_months).is_ok());

    let same_month = vec![
        income(1, "5e28", "2025-01-01", "Job", None),
        income(2, "5e28", "2025-01-20", "Bonus", None),
    ];
    assert_eq!(sum_by_month(&same_month).unwrap_err(), overflow);
}

#[test]
fn net_balance_past_decimal_range_is_an_error() {
    let mut salary = income(1, "0", "2025-01-01", "Job", None);
    salary.amount = Some(Amount::from(Decimal::MAX));
    let mut refund = expense(1, "0", "2025-01-02", "Refund", None);
    refund.amount = Some(Amount::from(Decimal::MIN));
    assert_eq!(
        net_balance(&[salary], &[refund]).unwrap_err(),
        MetricsError::Overflow {
            record: "income and expenses".into(),
            field: "net_balance",
        }
    );
}

#[test]
fn cancelled_subscriptions_still_count_in_breakdown() {
    let sub = |id: i64, amount: &str, status: SubscriptionStatus| SubscriptionRecord {
        id: Some(id),
        user_id: "u1".into(),
        name: format!("Service {}", id),
        amount: Some(Amount::from(amount)),
        billing_cycle: BillingCycle::Monthly,
        next_billing_date: None,
        category: Some("Streaming".into()),
        status,
        notes: None,
    };
    let subs = vec![
        sub(1, "9.99", SubscriptionStatus::Active),
        sub(2, "15", SubscriptionStatus::Cancelled),
    ];
    let by_cat = breakdown_by_category(&subs).unwrap();
    assert_eq!(by_cat["Streaming"].count, 2);
    assert_eq!(by_cat["Streaming"].total, d("24.99"));
}

#[test]
fn goal_without_saved_amount_is_uncategorized_zero() {
    let goal = SavingsGoalRecord {
        id: Some(1),
        user_id: "u1".into(),
        name: "Holiday".into(),
        target_amount: Some(Amount::from("2000")),
        current_amount: None,
        deadline: None,
        category: None,
        notes: None,
    };
    let by_cat = breakdown_by_category(&[goal]).unwrap();
    assert_eq!(by_cat.len(), 1);
    assert_eq!(by_cat[UNCATEGORIZED].count, 1);
    assert_eq!(by_cat[UNCATEGORIZED].total, Decimal::ZERO);
}
