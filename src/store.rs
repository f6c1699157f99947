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

//! CSV-backed ledger store.
//!
//! The whole collection lives in one CSV file and every mutation rewrites it:
//! load, change in memory, save. There is no locking; if two processes write
//! at once the last save wins.
//!
//! # File Format
//!
//! ```csv
//! Paid_By,Amount,Split_Type,Description,Time
//! Mannat,100,Split Half,groceries,2024-05-01 12:30:15
//! Minhaz,40,Full,,2024-05-02 08:00:00
//! ```
//!
//! A missing file reads as an empty ledger. The header is written on every
//! save, including saves of an empty collection.

use crate::base::{EntryId, Parties};
use crate::error::LedgerError;
use crate::settings::Settings;
use crate::transaction::{NewTransaction, Transaction};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Column names, in file order.
pub const HEADER: [&str; 5] = ["Paid_By", "Amount", "Split_Type", "Description", "Time"];

/// Raw CSV row matching [`HEADER`].
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Paid_By")]
    paid_by: String,
    #[serde(rename = "Amount")]
    amount: Decimal,
    #[serde(rename = "Split_Type")]
    split_type: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Time")]
    time: String,
}

impl CsvRecord {
    fn from_transaction(transaction: &Transaction, parties: &Parties) -> Self {
        Self {
            paid_by: parties.label(transaction.paid_by).to_string(),
            amount: transaction.amount,
            split_type: transaction.split_type.label().to_string(),
            description: transaction.description.clone(),
            time: transaction.time(),
        }
    }

    fn into_transaction(self, parties: &Parties) -> Result<Transaction, LedgerError> {
        let paid_by = parties.resolve(&self.paid_by)?;
        let split_type = self.split_type.parse()?;
        Transaction::restore(paid_by, self.amount, split_type, self.description, &self.time)
    }
}

/// Reads a ledger from CSV.
///
/// Empty input reads as an empty ledger. Any malformed row fails the whole
/// read; nothing is skipped.
///
/// # Errors
///
/// - [`LedgerError::UnexpectedHeader`] - the header is not [`HEADER`].
/// - [`LedgerError::Csv`] - a row has the wrong shape or an unparsable amount.
/// - [`LedgerError::UnknownParty`], [`LedgerError::UnknownSplitType`],
///   [`LedgerError::InvalidAmount`], [`LedgerError::InvalidTimestamp`] - a row
///   holds a value outside the ledger's domain.
pub fn read_transactions<R: Read>(
    reader: R,
    parties: &Parties,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(LedgerError::UnexpectedHeader {
            expected: HEADER.to_vec(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut transactions = Vec::new();
    for result in rdr.deserialize::<CsvRecord>() {
        transactions.push(result?.into_transaction(parties)?);
    }
    Ok(transactions)
}

/// Writes a ledger as CSV, header first.
pub fn write_transactions<W: Write>(
    writer: W,
    transactions: &[Transaction],
    parties: &Parties,
) -> Result<(), LedgerError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(HEADER)?;
    for transaction in transactions {
        wtr.serialize(CsvRecord::from_transaction(transaction, parties))?;
    }

    wtr.flush()?;
    Ok(())
}

/// File-backed ledger.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    parties: Parties,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>, parties: Parties) -> Self {
        Self {
            path: path.into(),
            parties,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.storage_path, settings.parties())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    /// Reads the whole ledger, in insertion order.
    ///
    /// A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<Transaction>, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "ledger file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let transactions = read_transactions(io::BufReader::new(file), &self.parties)?;
        tracing::debug!(count = transactions.len(), "ledger loaded");
        Ok(transactions)
    }

    /// Replaces the stored ledger with `transactions`.
    ///
    /// Writes a sibling temp file and renames it over the ledger, so readers
    /// see either the old or the new file. The temp file is removed if any
    /// step fails.
    pub fn save(&self, transactions: &[Transaction]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        let result = self
            .write_file(&tmp, transactions)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(LedgerError::from));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "temp file not removed");
            }
            return Err(e);
        }

        tracing::debug!(count = transactions.len(), path = %self.path.display(), "ledger saved");
        Ok(())
    }

    fn write_file(&self, path: &Path, transactions: &[Transaction]) -> Result<(), LedgerError> {
        let mut writer = io::BufWriter::new(File::create(path)?);
        write_transactions(&mut writer, transactions, &self.parties)?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())?
            .sync_all()?;
        Ok(())
    }

    /// Stamps `draft` with the current local time and appends it.
    pub fn append(&self, draft: NewTransaction) -> Result<Transaction, LedgerError> {
        let mut transactions = self.load()?;
        let transaction = draft.now();
        transactions.push(transaction.clone());
        self.save(&transactions)?;

        tracing::info!(
            paid_by = self.parties.label(transaction.paid_by),
            amount = %transaction.amount,
            split = %transaction.split_type,
            "transaction added"
        );
        Ok(transaction)
    }

    /// Removes the records at the given zero-based positions.
    ///
    /// Positions refer to the ledger as currently stored; remaining records
    /// keep their order. Positions past the end are ignored. Returns the
    /// number of records removed.
    ///
    /// Prefer [`LedgerStore::delete_ids`] when the ledger may have changed
    /// since the positions were read.
    pub fn delete_at(&self, positions: &BTreeSet<usize>) -> Result<usize, LedgerError> {
        let mut transactions = self.load()?;
        let before = transactions.len();

        for &position in positions.range(before..) {
            tracing::warn!(position, len = before, "ignoring out-of-range position");
        }

        let mut position = 0;
        transactions.retain(|_| {
            let keep = !positions.contains(&position);
            position += 1;
            keep
        });

        let removed = before - transactions.len();
        if removed > 0 {
            self.save(&transactions)?;
        }
        tracing::info!(removed, "transactions deleted by position");
        Ok(removed)
    }

    /// Removes records by identifier.
    ///
    /// Each id removes at most one record (the first match), so identical
    /// records entered within the same second are removed one per id.
    /// Unknown ids are ignored. Returns the number of records removed.
    pub fn delete_ids(&self, ids: &[EntryId]) -> Result<usize, LedgerError> {
        let mut transactions = self.load()?;
        let mut current: Vec<EntryId> = transactions.iter().map(Transaction::id).collect();
        let before = transactions.len();

        for id in ids {
            match current.iter().position(|c| c == id) {
                Some(index) => {
                    transactions.remove(index);
                    current.remove(index);
                }
                None => tracing::warn!(id = %id, "ignoring unknown entry id"),
            }
        }

        let removed = before - transactions.len();
        if removed > 0 {
            self.save(&transactions)?;
        }
        tracing::info!(removed, "transactions deleted by id");
        Ok(removed)
    }

    /// Empties the ledger, keeping the header.
    pub fn clear_all(&self) -> Result<(), LedgerError> {
        self.save(&[])?;
        tracing::info!("ledger cleared");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        // Per-process, so concurrent writers never share a temp file.
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Party, SplitType};
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn parties() -> Parties {
        Parties::new("Mannat", "Minhaz")
    }

    #[test]
    fn parse_simple_ledger() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,100,Split Half,groceries,2024-05-01 12:30:15\n\
                   Minhaz,40,Full,,2024-05-02 08:00:00\n";

        let txs = read_transactions(Cursor::new(csv), &parties()).unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].paid_by, Party::A);
        assert_eq!(txs[0].amount, dec!(100));
        assert_eq!(txs[0].split_type, SplitType::SplitHalf);
        assert_eq!(txs[0].description, "groceries");
        assert_eq!(txs[1].paid_by, Party::B);
        assert_eq!(txs[1].description, "");
        assert_eq!(txs[1].time(), "2024-05-02 08:00:00");
    }

    #[test]
    fn parse_float_formatted_amounts() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,250.0,Full,rent,2024-05-01 12:30:15\n";

        let txs = read_transactions(Cursor::new(csv), &parties()).unwrap();
        assert_eq!(txs[0].amount, dec!(250));
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n";
        assert!(read_transactions(Cursor::new(csv), &parties()).unwrap().is_empty());
    }

    #[test]
    fn zero_byte_input_is_empty() {
        assert!(read_transactions(Cursor::new(""), &parties()).unwrap().is_empty());
    }

    #[test]
    fn wrong_header_is_rejected() {
        let csv = "type,client,tx,amount\ndeposit,1,1,100.0\n";
        assert!(matches!(
            read_transactions(Cursor::new(csv), &parties()),
            Err(LedgerError::UnexpectedHeader { .. })
        ));
    }

    #[test]
    fn unknown_party_is_rejected() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Someone,10,Full,,2024-05-01 12:30:15\n";
        assert!(matches!(
            read_transactions(Cursor::new(csv), &parties()),
            Err(LedgerError::UnknownParty(_))
        ));
    }

    #[test]
    fn unparsable_amount_is_rejected() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,lots,Full,,2024-05-01 12:30:15\n";
        assert!(matches!(
            read_transactions(Cursor::new(csv), &parties()),
            Err(LedgerError::Csv(_))
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,-3,Full,,2024-05-01 12:30:15\n";
        assert!(matches!(
            read_transactions(Cursor::new(csv), &parties()),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,79228162514264337593543950335,Full,,2024-05-01 12:30:15\n\
                   Mannat,79228162514264337593543950335,Full,,2024-05-01 12:30:16\n";
        assert!(matches!(
            read_transactions(Cursor::new(csv), &parties()),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn largest_amounts_load_and_fold() {
        let csv = "Paid_By,Amount,Split_Type,Description,Time\n\
                   Mannat,18446744073709551615,Full,,2024-05-01 12:30:15\n\
                   Mannat,18446744073709551615,Full,,2024-05-01 12:30:16\n";
        let txs = read_transactions(Cursor::new(csv), &parties()).unwrap();

        let expected = Decimal::from(u64::MAX) * Decimal::TWO;
        assert_eq!(crate::compute_net_balance(&txs), expected);
        assert_eq!(crate::party_totals(&txs).a, expected);
    }

    #[test]
    fn write_emits_header_and_labels() {
        let csv_input = "Paid_By,Amount,Split_Type,Description,Time\n\
                         Minhaz,12.5,Split Half,\"coffee, cake\",2024-05-01 12:30:15\n";
        let txs = read_transactions(Cursor::new(csv_input), &parties()).unwrap();

        let mut output = Vec::new();
        write_transactions(&mut output, &txs, &parties()).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, csv_input);
    }

    #[test]
    fn write_empty_ledger_keeps_header() {
        let mut output = Vec::new();
        write_transactions(&mut output, &[], &parties()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Paid_By,Amount,Split_Type,Description,Time\n"
        );
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let store = LedgerStore::new("/data/finance_data.csv", parties());
        assert_eq!(
            store.temp_path(),
            PathBuf::from(format!("/data/finance_data.csv.{}.tmp", std::process::id()))
        );
    }
}
