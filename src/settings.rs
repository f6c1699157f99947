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

//! Runtime settings.
//!
//! Sources are layered, later ones winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`split-ledger.toml` unless another path is given)
//! 3. `SPLIT_LEDGER_*` environment variables, e.g. `SPLIT_LEDGER_STORAGE_PATH`
//!
//! ```toml
//! storage_path = "finance_data.csv"
//! admin_secret = "change-me"
//! party_a = "Mannat"
//! party_b = "Minhaz"
//! currency = "₹"
//! ```

use crate::base::Parties;
use crate::error::LedgerError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "split-ledger.toml";
pub const ENV_PREFIX: &str = "SPLIT_LEDGER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// CSV file holding the ledger.
    pub storage_path: PathBuf,
    /// Shared secret for the admin view.
    pub admin_secret: String,
    /// Label for [`Party::A`](crate::Party::A); positive balances are owed to this party.
    pub party_a: String,
    /// Label for [`Party::B`](crate::Party::B).
    pub party_b: String,
    /// Currency symbol prefixed to amounts in statements.
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("finance_data.csv"),
            admin_secret: "Admin123".to_string(),
            party_a: "Mannat".to_string(),
            party_b: "Minhaz".to_string(),
            currency: "₹".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from defaults, `file` (or [`DEFAULT_CONFIG_FILE`]) and
    /// the environment.
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(file: Option<&Path>) -> Result<Self, LedgerError> {
        Self::load_with_env(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self, LedgerError> {
        let defaults = Settings::default();
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("storage_path", defaults.storage_path.to_string_lossy().as_ref())?
            .set_default("admin_secret", defaults.admin_secret)?
            .set_default("party_a", defaults.party_a)?
            .set_default("party_b", defaults.party_b)?
            .set_default("currency", defaults.currency)?
            .add_source(file_source)
            .add_source(env)
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(storage_path = %settings.storage_path.display(), "settings loaded");
        Ok(settings)
    }

    /// Party labels must be distinct and non-empty, or `Paid_By` becomes ambiguous.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let (a, b) = (self.party_a.trim(), self.party_b.trim());
        if a.is_empty() || b.is_empty() || a == b {
            return Err(LedgerError::Config(config::ConfigError::Message(format!(
                "party labels must be distinct and non-empty (got {a:?} and {b:?})"
            ))));
        }
        Ok(())
    }

    pub fn parties(&self) -> Parties {
        Parties::new(self.party_a.trim(), self.party_b.trim())
    }
}
