// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monetary field as it was stored: rows from the hosted backend carry
/// numbers or strings, the local store keeps text. The metrics engine
/// coerces it to a `Decimal` and reports anything unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(Decimal),
}

impl Amount {
    pub fn raw(&self) -> String {
        match self {
            Amount::Text(s) => s.clone(),
            Amount::Number(d) => d.to_string(),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::Number(d)
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    PaidOff,
    Defaulted,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::PaidOff => "paid_off",
            LoanStatus::Defaulted => "defaulted",
        }
    }
}

impl FromStr for LoanStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "paid_off" => Ok(LoanStatus::PaidOff),
            "defaulted" => Ok(LoanStatus::Defaulted),
            other => Err(anyhow!(
                "Invalid loan status '{}', expected active|paid_off|defaulted",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(anyhow!(
                "Invalid subscription status '{}', expected active|cancelled",
                other
            )),
        }
    }
}

/// Recurrence of a subscription charge. Cycles outside the four known ones
/// are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Other(String),
}

impl BillingCycle {
    pub fn parse(s: &str) -> BillingCycle {
        match s.trim().to_lowercase().as_str() {
            "weekly" => BillingCycle::Weekly,
            "monthly" => BillingCycle::Monthly,
            "quarterly" => BillingCycle::Quarterly,
            "yearly" => BillingCycle::Yearly,
            _ => BillingCycle::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
            BillingCycle::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for BillingCycle {
    fn from(s: String) -> Self {
        BillingCycle::parse(&s)
    }
}

impl From<BillingCycle> for String {
    fn from(c: BillingCycle) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub amount: Option<Amount>,
    pub date: NaiveDate,
    pub source: String,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub amount: Option<Amount>,
    pub date: NaiveDate,
    pub name: String,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub initial_amount: Option<Amount>,
    pub current_balance: Option<Amount>,
    pub interest_rate: Option<Amount>,
    pub monthly_payment: Option<Amount>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub amount: Option<Amount>,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub status: SubscriptionStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub target_amount: Option<Amount>,
    pub current_amount: Option<Amount>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub amount: Option<Amount>,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub image_ref: Option<String>,
    pub notes: Option<String>,
}

/// Every record list for one user, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub income: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub loans: Vec<LoanRecord>,
    pub subscriptions: Vec<SubscriptionRecord>,
    pub savings: Vec<SavingsGoalRecord>,
    pub receipts: Vec<ReceiptRecord>,
}
