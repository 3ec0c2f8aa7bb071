// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod exporter;
pub mod importer;
pub mod loans;
pub mod receipts;
pub mod reports;
pub mod savings;
pub mod subscriptions;
pub mod transactions;
