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

//! Error types for the ledger and its aggregations.

use thiserror::Error;

/// Ledger errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A filter ran to completion without a single match.
    ///
    /// This is an expected outcome for a legitimate query, not an internal fault.
    #[error("no matching payments")]
    NoMatchingPayments,

    /// A payment with the same ID was already recorded
    #[error("duplicate payment ID")]
    DuplicatePayment,
}

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LedgerError::NoMatchingPayments.to_string(),
            "no matching payments"
        );
        assert_eq!(LedgerError::DuplicatePayment.to_string(), "duplicate payment ID");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LedgerError::NoMatchingPayments;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
