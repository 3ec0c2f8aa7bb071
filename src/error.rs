// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the metrics engine.
//!
//! Malformed numeric input is an error, and so is a sum or ratio that
//! leaves the range of `Decimal`. Zero divisors and unknown billing cycles
//! have defined results and never show up here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// A monetary field holds text that is not a decimal number.
    #[error("Invalid {field} '{value}' on {record}")]
    InvalidAmount {
        record: String,
        field: &'static str,
        value: String,
    },
    /// A required monetary field is null or blank.
    #[error("Missing {field} on {record}")]
    MissingAmount { record: String, field: &'static str },
    /// A derived value does not fit in a `Decimal`.
    #[error("Overflow computing {field} on {record}")]
    Overflow { record: String, field: &'static str },
}

impl MetricsError {
    pub(crate) fn overflow(record: impl Into<String>, field: &'static str) -> Self {
        MetricsError::Overflow {
            record: record.into(),
            field,
        }
    }
}
