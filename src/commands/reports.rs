// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::category::{CategoryStat, breakdown_by_category, sorted_breakdown};
use crate::metrics::loans::{average_interest_rate, loan_portfolio, total_monthly_payments};
use crate::metrics::savings::{overall_progress, total_savings_target};
use crate::metrics::subscriptions::{subscription_costs, upcoming_renewals};
use crate::metrics::totals::{dashboard_summary, receipt_stats, sum_by_month, total_savings_balance};
use crate::metrics::{Categorized, Monetary};
use crate::store::{self, RecordKind};
use crate::utils::{
    fmt_percent, format_amount, get_currency, maybe_print_json, pretty_table, resolve_user,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("subscriptions", sub)) => subscriptions(conn, sub)?,
        Some(("loans", sub)) => loans(conn, sub)?,
        Some(("savings", sub)) => savings(conn, sub)?,
        Some(("receipts", sub)) => receipts(conn, sub)?,
        Some(("income-trend", sub)) => income_trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn print_pairs(rows: Vec<(&str, String)>) {
    let data = rows
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect();
    println!("{}", pretty_table(&["Metric", "Value"], data));
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let snap = store::fetch_snapshot(conn, &user)?;
    let summary = dashboard_summary(&snap)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_pairs(vec![
        ("Total income", format_amount(summary.total_income, ccy)),
        ("Total expenses", format_amount(summary.total_expenses, ccy)),
        ("Net balance", format_amount(summary.net_balance, ccy)),
        ("Total debt", format_amount(summary.total_debt, ccy)),
        ("Active subscriptions", summary.active_subscriptions.to_string()),
        ("Total savings", format_amount(summary.total_savings, ccy)),
        ("Receipts", summary.receipts.to_string()),
        ("Transactions", summary.transactions.to_string()),
        ("Active features", summary.active_features.to_string()),
    ]);
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    count: usize,
    total: Decimal,
}

fn breakdown<R: Categorized>(records: &[R]) -> Result<Vec<(String, CategoryStat)>> {
    Ok(sorted_breakdown(breakdown_by_category(records)?))
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let kind: RecordKind = sub
        .get_one::<String>("kind")
        .map(|s| s.as_str())
        .unwrap_or("expense")
        .parse()?;
    let items = match kind {
        RecordKind::Income => breakdown(&store::fetch_income(conn, &user)?)?,
        RecordKind::Expense => breakdown(&store::fetch_expenses(conn, &user)?)?,
        RecordKind::Subscription => breakdown(&store::fetch_subscriptions(conn, &user)?)?,
        RecordKind::Savings => breakdown(&store::fetch_savings(conn, &user)?)?,
        RecordKind::Receipt => breakdown(&store::fetch_receipts(conn, &user)?)?,
        RecordKind::Loan => return Err(anyhow!("Loans have no category")),
    };
    let data: Vec<CategoryRow> = items
        .into_iter()
        .map(|(category, stat)| CategoryRow {
            category,
            count: stat.count,
            total: stat.total,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.count.to_string(),
                    format_amount(r.total, ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Count", &format!("Total ({})", ccy.code)], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct Renewal {
    id: Option<i64>,
    name: String,
    next_billing_date: Option<chrono::NaiveDate>,
    amount: Decimal,
}

#[derive(Serialize)]
struct SubscriptionReport {
    total_monthly: Decimal,
    total_yearly: Decimal,
    active_count: usize,
    upcoming: Vec<Renewal>,
}

fn subscriptions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let subs = store::fetch_subscriptions(conn, &user)?;
    let costs = subscription_costs(&subs)?;
    let mut upcoming = Vec::new();
    for s in upcoming_renewals(&subs) {
        upcoming.push(Renewal {
            id: s.id,
            name: s.name.clone(),
            next_billing_date: s.next_billing_date,
            amount: s.amount()?,
        });
    }
    let report = SubscriptionReport {
        total_monthly: costs.total_monthly,
        total_yearly: costs.total_yearly,
        active_count: costs.active_count,
        upcoming,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_pairs(vec![
        ("Monthly total", format_amount(report.total_monthly, ccy)),
        ("Yearly total", format_amount(report.total_yearly, ccy)),
        ("Active subscriptions", report.active_count.to_string()),
    ]);
    if !report.upcoming.is_empty() {
        let rows = report
            .upcoming
            .iter()
            .map(|r| {
                vec![
                    r.next_billing_date.map(|d| d.to_string()).unwrap_or_default(),
                    r.name.clone(),
                    format_amount(r.amount, ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Next billing", "Name", "Amount"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct LoanReport {
    total_debt: Decimal,
    total_initial: Decimal,
    total_paid: Decimal,
    progress_percent: Decimal,
    total_monthly_payments: Decimal,
    average_interest_rate: Decimal,
}

fn loans(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let loans = store::fetch_loans(conn, &user)?;
    let portfolio = loan_portfolio(&loans)?;
    let report = LoanReport {
        total_debt: portfolio.total_debt,
        total_initial: portfolio.total_initial,
        total_paid: portfolio.total_paid,
        progress_percent: portfolio.progress_percent,
        total_monthly_payments: total_monthly_payments(&loans)?,
        average_interest_rate: average_interest_rate(&loans)?,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_pairs(vec![
        ("Total debt", format_amount(report.total_debt, ccy)),
        ("Borrowed", format_amount(report.total_initial, ccy)),
        ("Paid off", format_amount(report.total_paid, ccy)),
        ("Overall progress", fmt_percent(report.progress_percent)),
        ("Monthly payments", format_amount(report.total_monthly_payments, ccy)),
        ("Average interest rate", fmt_percent(report.average_interest_rate)),
    ]);
    Ok(())
}

#[derive(Serialize)]
struct SavingsReport {
    total_saved: Decimal,
    total_target: Decimal,
    overall_progress: Decimal,
    goals: usize,
}

fn savings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let goals = store::fetch_savings(conn, &user)?;
    let report = SavingsReport {
        total_saved: total_savings_balance(&goals)?,
        total_target: total_savings_target(&goals)?,
        overall_progress: overall_progress(&goals)?,
        goals: goals.len(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_pairs(vec![
        ("Total saved", format_amount(report.total_saved, ccy)),
        ("Total target", format_amount(report.total_target, ccy)),
        ("Overall progress", fmt_percent(report.overall_progress)),
        ("Goals", report.goals.to_string()),
    ]);
    Ok(())
}

#[derive(Serialize)]
struct ReceiptReport {
    count: usize,
    total: Decimal,
    average: Decimal,
    by_category: HashMap<String, CategoryStat>,
}

fn receipts(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let receipts = store::fetch_receipts(conn, &user)?;
    let stats = receipt_stats(&receipts)?;
    let report = ReceiptReport {
        count: stats.count,
        total: stats.total,
        average: stats.average,
        by_category: breakdown_by_category(&receipts)?,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_pairs(vec![
        ("Receipts", report.count.to_string()),
        ("Total amount", format_amount(report.total, ccy)),
        ("Average", format_amount(report.average, ccy)),
    ]);
    let rows = sorted_breakdown(report.by_category)
        .into_iter()
        .map(|(cat, stat)| {
            vec![
                cat,
                format!("{} receipts", stat.count),
                format_amount(stat.total, ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Count", "Total"], rows));
    Ok(())
}

fn income_trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let income = store::fetch_income(conn, &user)?;
    let by_month = sum_by_month(&income)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &by_month)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = by_month
        .iter()
        .map(|(m, total)| vec![m.clone(), format_amount(*total, ccy)])
        .collect();
    println!("{}", pretty_table(&["Month", "Income"], rows));
    Ok(())
}
