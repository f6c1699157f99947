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

//! Balance public API integration tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_ledger::{
    NewTransaction, Parties, Party, Settlement, SplitType, Transaction, compute_net_balance,
    party_totals,
};

fn make(paid_by: Party, amount: Decimal, split_type: SplitType) -> Transaction {
    NewTransaction::new(paid_by, amount, split_type, None)
        .unwrap()
        .now()
}

#[test]
fn empty_ledger_is_settled() {
    assert_eq!(compute_net_balance(&[]), Decimal::ZERO);
}

#[test]
fn split_half_paid_by_a_is_owed_half() {
    let balance = compute_net_balance(&[make(Party::A, dec!(100), SplitType::SplitHalf)]);
    assert_eq!(balance, dec!(50));
    assert_eq!(Settlement::from_balance(balance), Settlement::BOwesA(dec!(50)));
}

#[test]
fn full_paid_by_b_is_owed_in_full() {
    let balance = compute_net_balance(&[make(Party::B, dec!(100), SplitType::Full)]);
    assert_eq!(balance, dec!(-100));
    assert_eq!(Settlement::from_balance(balance), Settlement::AOwesB(dec!(100)));
}

#[test]
fn equal_full_payments_cancel() {
    let balance = compute_net_balance(&[
        make(Party::A, dec!(100), SplitType::Full),
        make(Party::B, dec!(100), SplitType::Full),
    ]);
    assert_eq!(Settlement::from_balance(balance), Settlement::Settled);
}

#[test]
fn mixed_ledger() {
    // +60 (A half of 120) -30 (B full) +5 (A half of 10) -45 (B half of 90)
    let ledger = vec![
        make(Party::A, dec!(120), SplitType::SplitHalf),
        make(Party::B, dec!(30), SplitType::Full),
        make(Party::A, dec!(10), SplitType::SplitHalf),
        make(Party::B, dec!(90), SplitType::SplitHalf),
    ];
    let balance = compute_net_balance(&ledger);
    assert_eq!(balance, dec!(-10));

    let parties = Parties::new("Mannat", "Minhaz");
    assert_eq!(
        Settlement::from_balance(balance).describe(&parties, "₹"),
        "Mannat should pay Minhaz: ₹10.00"
    );

    let totals = party_totals(&ledger);
    assert_eq!(totals.a, dec!(130));
    assert_eq!(totals.b, dec!(120));
}

#[test]
fn reversing_order_does_not_change_balance() {
    let mut ledger = vec![
        make(Party::A, dec!(33), SplitType::SplitHalf),
        make(Party::B, dec!(17), SplitType::Full),
        make(Party::B, dec!(1), SplitType::SplitHalf),
    ];
    let forward = compute_net_balance(&ledger);
    ledger.reverse();
    assert_eq!(compute_net_balance(&ledger), forward);
}
