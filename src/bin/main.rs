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

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use split_ledger::balance::format_amount;
use split_ledger::{
    Access, AdminGate, EntryId, LedgerError, LedgerStore, NewTransaction, Parties, Party,
    Settings, Settlement, SplitType, Transaction, compute_net_balance, party_totals,
};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Split Ledger - Track shared expenses between two people
///
/// Records who paid and how the cost is split, and works out who owes whom.
#[derive(Parser, Debug)]
#[command(name = "split-ledger")]
#[command(about = "A two-party shared-expense ledger", long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults to ./split-ledger.toml if present
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ledger CSV file, overriding the configured storage path
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a transaction
    Add {
        /// Total amount paid (whole currency units, at least 1)
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        amount: u64,

        /// Who paid: `a`, `b`, or a party label
        #[arg(long, short = 'p')]
        paid_by: String,

        /// `half` to share the cost equally, `full` if the other party owes all of it
        #[arg(long, short = 's', default_value = "half")]
        split: SplitType,

        /// Optional note
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Show who owes whom
    Balance,

    /// Admin view: tables, deletion and clearing
    Admin {
        /// Admin password
        #[arg(long, env = "SPLIT_LEDGER_ADMIN_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,

        #[command(subcommand)]
        action: Option<AdminAction>,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum AdminAction {
    /// Per-party tables and the current balance (default)
    Show,
    /// Delete transactions by position, as numbered in `show` (mark as paid)
    Delete {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<usize>,
    },
    /// Delete transactions by id or unique id prefix (mark as paid)
    DeleteId {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Delete every transaction (mark all as paid)
    Clear,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Wrong password")]
    WrongPassword,

    #[error("admin password required")]
    NoPassword,

    #[error("unknown payer {0:?} (expected `a`, `b`, {1:?} or {2:?})")]
    UnknownPayer(String, String, String),

    #[error("no transaction matches id {0:?}")]
    NoMatch(String),

    #[error("id prefix {0:?} matches more than one transaction")]
    Ambiguous(String),

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };
    if let Some(path) = args.data_file {
        settings.storage_path = path;
    }

    if let Err(e) = run(args.command, &settings, &mut io::stdout().lock()) {
        match e {
            // Nothing entered: no success or failure message.
            CliError::NoPassword => {}
            e => eprintln!("Error: {}", e),
        }
        process::exit(1);
    }
}

fn run<W: Write>(command: Command, settings: &Settings, out: &mut W) -> Result<(), CliError> {
    let store = LedgerStore::from_settings(settings);
    let parties = store.parties();

    match command {
        Command::Add {
            amount,
            paid_by,
            split,
            description,
        } => {
            let payer = parse_payer(parties, &paid_by)?;
            let draft =
                NewTransaction::new(payer, Decimal::from(amount), split, description.as_deref())?;
            let tx = store.append(draft)?;
            writeln!(out, "{}", confirmation(&tx, parties, &settings.currency))?;
        }
        Command::Balance => {
            let balance = compute_net_balance(&store.load()?);
            writeln!(
                out,
                "{}",
                Settlement::from_balance(balance).describe(parties, &settings.currency)
            )?;
        }
        Command::Admin { password, action } => {
            match AdminGate::new(&settings.admin_secret).check(&password) {
                Access::Granted => {}
                Access::Denied => return Err(CliError::WrongPassword),
                Access::Empty => return Err(CliError::NoPassword),
            }
            admin(action.unwrap_or(AdminAction::Show), &store, settings, out)?;
        }
    }

    Ok(())
}

fn admin<W: Write>(
    action: AdminAction,
    store: &LedgerStore,
    settings: &Settings,
    out: &mut W,
) -> Result<(), CliError> {
    match action {
        AdminAction::Show => {
            let transactions = store.load()?;
            show(&transactions, store.parties(), &settings.currency, out)?;
        }
        AdminAction::Delete { positions } => {
            let positions: BTreeSet<usize> = positions.into_iter().collect();
            let removed = store.delete_at(&positions)?;
            if let Some(note) = skipped_note(positions.len(), removed) {
                eprintln!("{}", note);
            }
            writeln!(out, "Deleted {} transaction(s) (marked as paid)", removed)?;
        }
        AdminAction::DeleteId { ids } => {
            let snapshot = store.load()?;
            let ids = resolve_ids(&snapshot, &ids)?;
            let removed = store.delete_ids(&ids)?;
            writeln!(out, "Deleted {} transaction(s) (marked as paid)", removed)?;
        }
        AdminAction::Clear => {
            store.clear_all()?;
            writeln!(out, "All balances cleared")?;
        }
    }
    Ok(())
}

/// Note for positions that named no record; `None` when all were deleted.
fn skipped_note(requested: usize, removed: usize) -> Option<String> {
    let skipped = requested.saturating_sub(removed);
    (skipped > 0).then(|| {
        format!("Note: {skipped} position(s) out of range and skipped; see `admin show` for numbering")
    })
}

/// Accepts `a`/`b` or either party's label, ignoring case.
fn parse_payer(parties: &Parties, input: &str) -> Result<Party, CliError> {
    let input = input.trim();
    Party::ALL
        .into_iter()
        .find(|&party| {
            let short = match party {
                Party::A => "a",
                Party::B => "b",
            };
            input.eq_ignore_ascii_case(short) || input.eq_ignore_ascii_case(parties.label(party))
        })
        .ok_or_else(|| {
            CliError::UnknownPayer(
                input.to_string(),
                parties.label(Party::A).to_string(),
                parties.label(Party::B).to_string(),
            )
        })
}

/// Expands id prefixes against a loaded snapshot.
///
/// Identical records share an id, so several matching rows with the same id
/// still resolve.
fn resolve_ids(snapshot: &[Transaction], prefixes: &[String]) -> Result<Vec<EntryId>, CliError> {
    let ids: BTreeSet<EntryId> = snapshot.iter().map(Transaction::id).collect();
    prefixes
        .iter()
        .map(|prefix| {
            let prefix = prefix.trim();
            let matches: Vec<&EntryId> = ids.iter().filter(|id| id.matches_prefix(prefix)).collect();
            match matches.as_slice() {
                [id] => Ok((*id).clone()),
                [] => Err(CliError::NoMatch(prefix.to_string())),
                _ => Err(CliError::Ambiguous(prefix.to_string())),
            }
        })
        .collect()
}

fn confirmation(tx: &Transaction, parties: &Parties, currency: &str) -> String {
    let mut line = format!(
        "{} paid {}{} ({})",
        parties.label(tx.paid_by),
        currency,
        tx.amount,
        tx.split_type
    );
    if !tx.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&tx.description);
    }
    line
}

/// Per-party tables, numbered by ledger position, followed by the balance.
fn show<W: Write>(
    transactions: &[Transaction],
    parties: &Parties,
    currency: &str,
    out: &mut W,
) -> io::Result<()> {
    let totals = party_totals(transactions);

    for party in Party::ALL {
        writeln!(out, "== {} ==", parties.label(party))?;
        writeln!(
            out,
            "{:>4}  {:>10}  {:<10}  {:<19}  {:<12}  Description",
            "#", "Amount", "Split_Type", "Time", "Id"
        )?;
        let rows: Vec<_> = transactions
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.paid_by == party)
            .collect();
        if rows.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (position, tx) in rows {
            writeln!(
                out,
                "{:>4}  {:>10}  {:<10}  {:<19}  {:<12}  {}",
                position,
                tx.amount.to_string(),
                tx.split_type.label(),
                tx.time(),
                tx.id().short(),
                tx.description
            )?;
        }
        writeln!(out, "Total paid: {}{}", currency, format_amount(totals.get(party)))?;
        writeln!(out)?;
    }

    let balance = compute_net_balance(transactions);
    writeln!(out, "Current balance: {}", Settlement::from_balance(balance).describe(parties, currency))
}
