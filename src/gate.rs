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

//! Shared-secret gate for the admin view.

/// Outcome of an admin login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Non-empty input that does not match. Callers show a notice.
    Denied,
    /// Nothing entered. Callers show neither success nor failure.
    Empty,
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, attempt: &str) -> Access {
        if attempt.is_empty() {
            return Access::Empty;
        }
        if constant_time_eq(attempt.as_bytes(), self.secret.as_bytes()) {
            tracing::debug!("admin access granted");
            Access::Granted
        } else {
            tracing::warn!("admin access denied");
            Access::Denied
        }
    }
}

/// Compares without short-circuiting on the first differing byte.
///
/// Length is not hidden.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
