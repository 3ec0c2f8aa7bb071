// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Categorized, accumulate};
use crate::error::MetricsError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Bucket for records without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub count: usize,
    pub total: Decimal,
}

/// Category name used for grouping. Blank labels fall into
/// [`UNCATEGORIZED`].
pub fn category_key(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => UNCATEGORIZED,
    }
}

pub fn sum_by_category<R: Categorized>(
    records: &[R],
) -> Result<HashMap<String, Decimal>, MetricsError> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for r in records {
        let amount = r.amount()?;
        let total = agg
            .entry(category_key(r.category()).to_string())
            .or_insert(Decimal::ZERO);
        *total = accumulate(*total, amount, r, R::FIELD)?;
    }
    Ok(agg)
}

pub fn breakdown_by_category<R: Categorized>(
    records: &[R],
) -> Result<HashMap<String, CategoryStat>, MetricsError> {
    let mut agg: HashMap<String, CategoryStat> = HashMap::new();
    for r in records {
        let amount = r.amount()?;
        let stat = agg
            .entry(category_key(r.category()).to_string())
            .or_default();
        stat.count += 1;
        stat.total = accumulate(stat.total, amount, r, R::FIELD)?;
    }
    Ok(agg)
}

/// Largest total first; ties broken by name so the order is stable.
pub fn sorted_by_total(agg: HashMap<String, Decimal>) -> Vec<(String, Decimal)> {
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

pub fn sorted_breakdown(agg: HashMap<String, CategoryStat>) -> Vec<(String, CategoryStat)> {
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));
    items
}
