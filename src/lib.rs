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

//! # Split Ledger
//!
//! A shared-expense ledger for two parties. Each record says who paid, how
//! much, and whether the cost is split in half or owed in full by the other
//! party; the net balance says who owes whom.
//!
//! ## Core Components
//!
//! - [`LedgerStore`]: CSV-backed persistence (load, save, append, delete, clear)
//! - [`compute_net_balance`] and [`Settlement`]: the balance fold and its reading
//! - [`AdminGate`]: shared-secret check for the admin view
//! - [`Settings`]: storage path, admin secret and party labels
//!
//! ## Example
//!
//! ```
//! use split_ledger::{LedgerStore, NewTransaction, Parties, Party, Settlement, SplitType};
//! use split_ledger::compute_net_balance;
//! use rust_decimal_macros::dec;
//!
//! let path = std::env::temp_dir().join(format!("split-ledger-doc-{}.csv", std::process::id()));
//! let store = LedgerStore::new(&path, Parties::new("Mannat", "Minhaz"));
//!
//! let draft = NewTransaction::new(Party::B, dec!(100), SplitType::Full, Some("rent")).unwrap();
//! store.append(draft).unwrap();
//!
//! let balance = compute_net_balance(&store.load().unwrap());
//! assert_eq!(Settlement::from_balance(balance), Settlement::AOwesB(dec!(100)));
//! # std::fs::remove_file(&path).unwrap();
//! ```

pub mod balance;
mod base;
pub mod error;
mod gate;
pub mod settings;
pub mod store;
mod transaction;

pub use balance::{PartyTotals, Settlement, compute_net_balance, party_totals};
pub use base::{EntryId, Parties, Party, SplitType};
pub use error::LedgerError;
pub use gate::{Access, AdminGate};
pub use settings::Settings;
pub use store::LedgerStore;
pub use transaction::{MAX_AMOUNT, NewTransaction, TIME_FORMAT, Transaction};
