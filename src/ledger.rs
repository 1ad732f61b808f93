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

//! Thread-safe payment log and its read-only snapshots.
//!
//! The [`Ledger`] keeps payments in insertion order and rejects duplicate
//! payment IDs. Sum and filter borrow the live list under its read lock for
//! the duration of the call, so recorders wait until the aggregation joins.
//! The streaming sum outlives the call and works on a [`Snapshot`], an
//! immutable point-in-time copy that is cheap to share between worker threads.

use crate::base::{AccountId, Money, PaymentId};
use crate::payment::Payment;
use crate::progress::{self, ProgressStream};
use crate::{LedgerError, engine};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::ops::Deref;
use std::sync::Arc;

/// Immutable, ordered view of the ledger's payments.
///
/// Cloning is O(1); all clones share the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    payments: Arc<[Payment]>,
}

impl Snapshot {
    /// Number of live handles sharing this snapshot's storage.
    #[cfg(test)]
    pub(crate) fn share_count(&self) -> usize {
        Arc::strong_count(&self.payments)
    }
}

impl Deref for Snapshot {
    type Target = [Payment];

    fn deref(&self) -> &[Payment] {
        &self.payments
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Vec::<Payment>::new().into()
    }
}

impl From<Vec<Payment>> for Snapshot {
    fn from(payments: Vec<Payment>) -> Self {
        Self {
            payments: payments.into(),
        }
    }
}

impl FromIterator<Payment> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Payment>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

/// Append-only payment log.
///
/// Combines a [`DashMap`] for O(1) duplicate checking with an ordered
/// [`Vec`] behind a [`RwLock`]. Lock order is always ID map first, then the
/// payment list.
#[derive(Debug, Default)]
pub struct Ledger {
    /// IDs of every recorded payment.
    ids: DashMap<PaymentId, ()>,

    /// Payments in insertion order.
    payments: RwLock<Vec<Payment>>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payment.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicatePayment`] if a payment with the same ID
    /// has already been recorded.
    pub fn record(&self, payment: Payment) -> Result<(), LedgerError> {
        // Entry API keeps check-and-insert atomic across concurrent recorders
        match self.ids.entry(payment.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicatePayment),
            Entry::Vacant(entry) => {
                self.payments.write().push(payment);
                entry.insert(());
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.payments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.read().is_empty()
    }

    /// Copies the current payments into an immutable [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            payments: Arc::from(self.payments.read().as_slice()),
        }
    }

    /// Total of all payment amounts. See [`engine::sum`].
    pub fn sum_payments(&self, workers: usize) -> Money {
        engine::sum(&self.payments.read(), workers)
    }

    /// Payments owned by `account_id`. See [`engine::filter_by_account`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NoMatchingPayments`] if the account has no payments.
    pub fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>, LedgerError> {
        engine::filter_by_account(&self.payments.read(), account_id, workers)
    }

    /// Payments matching `predicate`. See [`engine::filter`].
    ///
    /// The ledger stays read-locked while `predicate` runs, so it must not
    /// record into this ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NoMatchingPayments`] if nothing matched.
    pub fn filter_payments_by_fn<F>(
        &self,
        predicate: F,
        workers: usize,
    ) -> Result<Vec<Payment>, LedgerError>
    where
        F: Fn(&Payment) -> bool + Sync,
    {
        engine::filter(&self.payments.read(), predicate, workers)
    }

    /// Streams partial sums of the current payments. See [`progress::sum_with_progress`].
    pub fn sum_payments_with_progress(&self) -> ProgressStream {
        progress::sum_with_progress(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: &str, amount: i64) -> Payment {
        Payment::new(id, AccountId(1), Money(amount), "auto")
    }

    #[test]
    fn record_preserves_insertion_order() {
        let ledger = Ledger::new();
        ledger.record(payment("b", 2)).unwrap();
        ledger.record(payment("a", 1)).unwrap();

        let snapshot = ledger.snapshot();
        let ids: Vec<_> = snapshot.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let ledger = Ledger::new();
        ledger.record(payment("a", 1)).unwrap();
        assert_eq!(
            ledger.record(payment("a", 5)),
            Err(LedgerError::DuplicatePayment)
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_records() {
        let ledger = Ledger::new();
        ledger.record(payment("a", 1)).unwrap();
        let before = ledger.snapshot();
        ledger.record(payment("b", 2)).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(ledger.snapshot().len(), 2);
    }

    #[test]
    fn snapshot_clones_share_storage() {
        let snapshot: Snapshot = vec![payment("a", 1)].into();
        let clone = snapshot.clone();
        assert!(std::ptr::eq(snapshot.as_ptr(), clone.as_ptr()));
    }

    #[test]
    fn borrowing_aggregations_take_no_snapshot() {
        let ledger = Ledger::new();
        ledger.record(payment("a", 10)).unwrap();
        ledger.record(payment("b", 20)).unwrap();

        let before = ledger.payments.read().as_ptr();
        assert_eq!(ledger.sum_payments(2), Money(30));
        assert_eq!(ledger.filter_payments(AccountId(1), 2).unwrap().len(), 2);
        assert_eq!(ledger.filter_payments_by_fn(|p| p.amount > Money(15), 2).unwrap().len(), 1);

        // Readers ran in place: the list was neither moved nor left locked.
        assert_eq!(ledger.payments.read().as_ptr(), before);
        assert!(ledger.payments.try_write().is_some());
    }

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert!(ledger.snapshot().is_empty());
        assert_eq!(ledger.sum_payments(4), Money::ZERO);
    }
}
