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

//! Error types for ledger storage and configuration.

use thiserror::Error;

/// Ledger errors.
///
/// A missing ledger file is never an error; everything here means the file
/// could not be read or written, or holds something we cannot interpret.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Underlying file operation failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The ledger file is not valid CSV or has the wrong shape
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The ledger file header does not match the expected columns
    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    UnexpectedHeader {
        expected: Vec<&'static str>,
        found: Vec<String>,
    },

    /// `Paid_By` holds a label that is neither configured party
    #[error("unknown party: {0:?}")]
    UnknownParty(String),

    /// `Split_Type` holds an unrecognized label
    #[error("unknown split type: {0:?}")]
    UnknownSplitType(String),

    /// Amount is zero, negative, or above `MAX_AMOUNT`
    #[error("invalid amount (must be positive and at most 18446744073709551615)")]
    InvalidAmount,

    /// `Time` is not in `YYYY-MM-DD HH:MM:SS` form
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Settings could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LedgerError::InvalidAmount.to_string(),
            "invalid amount (must be positive and at most 18446744073709551615)"
        );
        assert_eq!(
            LedgerError::UnknownParty("Bob".into()).to_string(),
            "unknown party: \"Bob\""
        );
        assert_eq!(
            LedgerError::UnknownSplitType("Third".into()).to_string(),
            "unknown split type: \"Third\""
        );
        assert_eq!(
            LedgerError::InvalidTimestamp("yesterday".into()).to_string(),
            "invalid timestamp: \"yesterday\""
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: LedgerError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert_eq!(err.to_string(), "i/o error: disk gone");
    }
}
