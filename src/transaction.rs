// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Ledger records.
//!
//! A [`NewTransaction`] is what a caller submits; the store stamps it with the
//! current local time and persists it as a [`Transaction`]. Records are never
//! modified after that, only deleted.

use crate::base::{EntryId, Party, SplitType};
use crate::error::LedgerError;
use chrono::{Local, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Format of the `Time` column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest accepted amount (`u64::MAX`).
///
/// Keeps sums over any loadable ledger well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(u32::MAX, u32::MAX, 0, false, 0);

fn check_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(amount)
}

/// A transaction awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    paid_by: Party,
    amount: Decimal,
    split_type: SplitType,
    description: String,
}

impl NewTransaction {
    /// Creates a draft record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] if `amount` is not positive or
    /// exceeds [`MAX_AMOUNT`].
    pub fn new(
        paid_by: Party,
        amount: Decimal,
        split_type: SplitType,
        description: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let amount = check_amount(amount)?;
        Ok(Self {
            paid_by,
            amount,
            split_type,
            description: description.map(str::trim).unwrap_or_default().to_string(),
        })
    }

    /// Stamps the draft with `timestamp`, truncated to whole seconds.
    pub fn at(self, timestamp: NaiveDateTime) -> Transaction {
        Transaction {
            paid_by: self.paid_by,
            amount: self.amount,
            split_type: self.split_type,
            description: self.description,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
        }
    }

    /// Stamps the draft with the current local time.
    pub fn now(self) -> Transaction {
        self.at(Local::now().naive_local())
    }
}

/// A persisted ledger record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub paid_by: Party,
    pub amount: Decimal,
    pub split_type: SplitType,
    /// Empty when no description was given.
    pub description: String,
    pub timestamp: NaiveDateTime,
}

impl Transaction {
    /// Rebuilds a record read back from storage.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] - amount is not positive or exceeds [`MAX_AMOUNT`].
    /// - [`LedgerError::InvalidTimestamp`] - `time` is not `YYYY-MM-DD HH:MM:SS`.
    pub fn restore(
        paid_by: Party,
        amount: Decimal,
        split_type: SplitType,
        description: String,
        time: &str,
    ) -> Result<Self, LedgerError> {
        let amount = check_amount(amount)?;
        let timestamp = NaiveDateTime::parse_from_str(time.trim(), TIME_FORMAT)
            .map_err(|_| LedgerError::InvalidTimestamp(time.to_string()))?;
        Ok(Self {
            paid_by,
            amount,
            split_type,
            description,
            timestamp,
        })
    }

    /// The `Time` column value.
    pub fn time(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }

    /// Fingerprint of the persisted fields.
    ///
    /// Independent of party labels and of how the amount was written
    /// (`100` and `100.0` hash the same).
    pub fn id(&self) -> EntryId {
        let payer = match self.paid_by {
            Party::A => "A",
            Party::B => "B",
        };
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}|{}|{}",
            payer,
            self.amount.normalize(),
            self.split_type.label(),
            self.description,
            self.time()
        ));
        EntryId(format!("{:x}", hasher.finalize()))
    }
}
