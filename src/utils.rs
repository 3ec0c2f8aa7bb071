// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_USER: &str = "default";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Like `parse_decimal`, for amounts the user types in: must not be negative.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(anyhow!("Amount '{}' must not be negative", s));
    }
    Ok(d)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", name: "US Dollar" },
    Currency { code: "EUR", symbol: "€", name: "Euro" },
    Currency { code: "GBP", symbol: "£", name: "British Pound" },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar" },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    Currency { code: "CHF", symbol: "Fr", name: "Swiss Franc" },
    Currency { code: "CNY", symbol: "¥", name: "Chinese Yuan" },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee" },
];

impl Currency {
    pub fn lookup(code: &str) -> Result<&'static Currency> {
        let code = code.trim().to_uppercase();
        CURRENCIES
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| anyhow!("Unsupported currency '{}'", code))
    }
}

pub fn round_money(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_percent(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Progress bars only; reported values stay unclamped.
pub fn clamp_percent(d: Decimal) -> Decimal {
    d.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Symbol, thousands separators and two decimals, e.g. `-$1,234.50`.
pub fn format_amount(d: Decimal, ccy: &Currency) -> String {
    let rounded = round_money(d);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, ccy.symbol, grouped, frac_part)
}

pub fn fmt_percent(d: Decimal) -> String {
    format!("{:.1}%", round_percent(d))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<&'static Currency> {
    let code = get_setting(conn, "currency")?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    Currency::lookup(&code)
}

pub fn set_currency(conn: &Connection, code: &str) -> Result<&'static Currency> {
    let ccy = Currency::lookup(code)?;
    set_setting(conn, "currency", ccy.code)?;
    Ok(ccy)
}

pub fn get_active_user(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "user")?.unwrap_or_else(|| DEFAULT_USER.to_string()))
}

pub fn set_active_user(conn: &Connection, user: &str) -> Result<()> {
    let user = user.trim();
    if user.is_empty() {
        return Err(anyhow!("User id must not be empty"));
    }
    set_setting(conn, "user", user)
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn required_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("Missing --{}", name))
}

pub fn optional_text(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn optional_date(m: &clap::ArgMatches, name: &str) -> Result<Option<NaiveDate>> {
    m.get_one::<String>(name).map(|s| parse_date(s)).transpose()
}

/// The `--user` override if given, else the configured user.
pub fn resolve_user(conn: &Connection, m: &clap::ArgMatches) -> Result<String> {
    match m.try_get_one::<String>("user").ok().flatten() {
        Some(u) if !u.trim().is_empty() => Ok(u.trim().to_string()),
        _ => get_active_user(conn),
    }
}
