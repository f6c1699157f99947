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

//! Net balance computation.
//!
//! The balance is a signed fold over every record:
//!
//! | Split | Paid by A | Paid by B |
//! |-------|-----------|-----------|
//! | Split Half | `+amount / 2` | `-amount / 2` |
//! | Full | `+amount` | `-amount` |
//!
//! A positive result means B owes A; a negative result means A owes B.
//! Nothing is cached: callers recompute from a freshly loaded collection.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use split_ledger::{NewTransaction, Party, Settlement, SplitType, compute_net_balance};
//!
//! let dinner = NewTransaction::new(Party::A, dec!(100), SplitType::SplitHalf, Some("dinner"))
//!     .unwrap()
//!     .now();
//! let balance = compute_net_balance(&[dinner]);
//! assert_eq!(balance, dec!(50));
//! assert_eq!(Settlement::from_balance(balance), Settlement::BOwesA(dec!(50)));
//! ```

use crate::base::{Parties, Party, SplitType};
use crate::transaction::Transaction;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Balances smaller than this in magnitude count as settled.
pub const SETTLED_EPSILON: Decimal = dec!(0.01);

/// Signed amount a single record moves the balance by.
pub fn contribution(transaction: &Transaction) -> Decimal {
    let magnitude = match transaction.split_type {
        SplitType::SplitHalf => transaction.amount / dec!(2),
        SplitType::Full => transaction.amount,
    };
    match transaction.paid_by {
        Party::A => magnitude,
        Party::B => -magnitude,
    }
}

/// Folds the collection into a signed net balance.
///
/// Order-independent; an empty collection yields exactly zero.
pub fn compute_net_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(contribution)
        .fold(Decimal::ZERO, |acc, c| acc + c)
}

/// Who owes whom, derived from a net balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Settled,
    /// B should pay A this amount.
    BOwesA(Decimal),
    /// A should pay B this amount.
    AOwesB(Decimal),
}

impl Settlement {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance.abs() < SETTLED_EPSILON {
            Settlement::Settled
        } else if balance > Decimal::ZERO {
            Settlement::BOwesA(balance)
        } else {
            Settlement::AOwesB(balance.abs())
        }
    }

    /// Returns `(debtor, creditor, amount)`, or `None` when settled.
    pub fn debt(&self) -> Option<(Party, Party, Decimal)> {
        match *self {
            Settlement::Settled => None,
            Settlement::BOwesA(amount) => Some((Party::B, Party::A, amount)),
            Settlement::AOwesB(amount) => Some((Party::A, Party::B, amount)),
        }
    }

    /// Human-readable statement, e.g. `Minhaz should pay Mannat: ₹50.00`.
    pub fn describe(&self, parties: &Parties, currency: &str) -> String {
        match self.debt() {
            None => "All settled!".to_string(),
            Some((debtor, creditor, amount)) => format!(
                "{} should pay {}: {}{}",
                parties.label(debtor),
                parties.label(creditor),
                currency,
                format_amount(amount)
            ),
        }
    }
}

/// Formats an amount with two decimal places.
///
/// Midpoints round away from zero, so `12.345` shows as `12.35`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Sum of amounts fronted by each party, regardless of split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartyTotals {
    pub a: Decimal,
    pub b: Decimal,
}

impl PartyTotals {
    pub fn get(&self, party: Party) -> Decimal {
        match party {
            Party::A => self.a,
            Party::B => self.b,
        }
    }
}

pub fn party_totals(transactions: &[Transaction]) -> PartyTotals {
    transactions
        .iter()
        .fold(PartyTotals::default(), |mut totals, tx| {
            match tx.paid_by {
                Party::A => totals.a += tx.amount,
                Party::B => totals.b += tx.amount,
            }
            totals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::NewTransaction;
    use chrono::NaiveDate;

    fn tx(paid_by: Party, amount: Decimal, split_type: SplitType) -> Transaction {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        NewTransaction::new(paid_by, amount, split_type, None)
            .unwrap()
            .at(ts)
    }

    #[test]
    fn empty_collection_is_zero() {
        assert_eq!(compute_net_balance(&[]), Decimal::ZERO);
        assert_eq!(Settlement::from_balance(Decimal::ZERO), Settlement::Settled);
    }

    #[test]
    fn split_half_paid_by_a() {
        let balance = compute_net_balance(&[tx(Party::A, dec!(100), SplitType::SplitHalf)]);
        assert_eq!(balance, dec!(50));
    }

    #[test]
    fn full_paid_by_b() {
        let balance = compute_net_balance(&[tx(Party::B, dec!(100), SplitType::Full)]);
        assert_eq!(balance, dec!(-100));
    }

    #[test]
    fn opposing_full_payments_settle() {
        let balance = compute_net_balance(&[
            tx(Party::A, dec!(100), SplitType::Full),
            tx(Party::B, dec!(100), SplitType::Full),
        ]);
        assert_eq!(balance, Decimal::ZERO);
        assert_eq!(Settlement::from_balance(balance), Settlement::Settled);
    }

    #[test]
    fn odd_amounts_halve_exactly() {
        let balance = compute_net_balance(&[tx(Party::B, dec!(75), SplitType::SplitHalf)]);
        assert_eq!(balance, dec!(-37.5));
    }

    #[test]
    fn settlement_thresholds() {
        assert_eq!(Settlement::from_balance(dec!(0.009)), Settlement::Settled);
        assert_eq!(Settlement::from_balance(dec!(-0.009)), Settlement::Settled);
        assert_eq!(Settlement::from_balance(dec!(0.01)), Settlement::BOwesA(dec!(0.01)));
        assert_eq!(Settlement::from_balance(dec!(-12.5)), Settlement::AOwesB(dec!(12.5)));
    }

    #[test]
    fn describe_names_debtor_and_creditor() {
        let parties = Parties::new("Mannat", "Minhaz");
        assert_eq!(
            Settlement::BOwesA(dec!(50)).describe(&parties, "₹"),
            "Minhaz should pay Mannat: ₹50.00"
        );
        assert_eq!(
            Settlement::AOwesB(dec!(12.345)).describe(&parties, "$"),
            "Mannat should pay Minhaz: $12.35"
        );
        assert_eq!(Settlement::Settled.describe(&parties, "₹"), "All settled!");
    }

    #[test]
    fn totals_per_party() {
        let totals = party_totals(&[
            tx(Party::A, dec!(100), SplitType::SplitHalf),
            tx(Party::A, dec!(20), SplitType::Full),
            tx(Party::B, dec!(7), SplitType::Full),
        ]);
        assert_eq!(totals.get(Party::A), dec!(120));
        assert_eq!(totals.get(Party::B), dec!(7));
    }
}
