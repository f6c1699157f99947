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

//! Core value types: the two parties, split policies, and record identifiers.

use crate::error::LedgerError;
use std::fmt;
use std::str::FromStr;

/// One of the two parties sharing the ledger.
///
/// Positive net balances are owed *to* [`Party::A`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Party {
    A,
    B,
}

impl Party {
    pub const ALL: [Party; 2] = [Party::A, Party::B];

    /// Returns the other party.
    pub fn other(self) -> Party {
        match self {
            Party::A => Party::B,
            Party::B => Party::A,
        }
    }
}

/// Display labels for the two parties.
///
/// Labels are what gets written to the `Paid_By` column, so changing them
/// after records exist makes those records unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parties {
    a: String,
    b: String,
}

impl Parties {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn label(&self, party: Party) -> &str {
        match party {
            Party::A => &self.a,
            Party::B => &self.b,
        }
    }

    /// Resolves a stored `Paid_By` label back to a [`Party`].
    ///
    /// Matching is exact after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownParty`] if the label matches neither party.
    pub fn resolve(&self, label: &str) -> Result<Party, LedgerError> {
        let label = label.trim();
        if label == self.a {
            Ok(Party::A)
        } else if label == self.b {
            Ok(Party::B)
        } else {
            Err(LedgerError::UnknownParty(label.to_string()))
        }
    }
}

/// How the cost of a transaction is attributed between the parties.
///
/// Stored in the `Split_Type` column as [`SplitType::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitType {
    /// Cost is shared equally; half of it is owed by the other party.
    SplitHalf,
    /// The other party owes the whole amount.
    Full,
}

impl SplitType {
    pub fn label(self) -> &'static str {
        match self {
            SplitType::SplitHalf => "Split Half",
            SplitType::Full => "Full",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SplitType {
    type Err = LedgerError;

    /// Accepts the stored labels as well as the short forms `half` and `full`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "split half" | "half" | "split" => Ok(SplitType::SplitHalf),
            "full" => Ok(SplitType::Full),
            _ => Err(LedgerError::UnknownSplitType(s.trim().to_string())),
        }
    }
}

/// Stable identifier for a stored record.
///
/// Derived from the record's persisted fields, so it stays the same across
/// reloads and unaffected by deletions of other records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) String);

impl EntryId {
    /// Number of hex digits shown in short form.
    pub const SHORT_LEN: usize = 12;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used when listing records.
    pub fn short(&self) -> &str {
        &self.0[..Self::SHORT_LEN.min(self.0.len())]
    }

    /// Returns true if `prefix` is a (case-insensitive) prefix of this id.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.starts_with(&prefix.to_lowercase())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
