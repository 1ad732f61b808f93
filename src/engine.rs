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

//! Partitioned parallel aggregation engine.
//!
//! Splits a payment slice with [`partition::plan`] and runs one scoped worker
//! thread per partition. Workers fold their partition into a local result and
//! only then take the shared lock to merge, so the lock is held for the merge
//! and never for the scan.
//!
//! # Operations
//!
//! - [`sum`]: total of all payment amounts.
//! - [`filter`]: payments matching a caller-supplied predicate.
//! - [`filter_by_account`]: payments owned by one account.
//!
//! All three block until every worker has joined. `workers` of 0 or 1 runs a
//! single worker; the result never depends on the worker count.
//!
//! # Ordering
//!
//! Filter results keep the relative order of payments within a partition, but
//! partitions are appended in the order their workers finish, so the order
//! across partitions varies between runs.
//!
//! # Panics
//!
//! A panic inside a worker (for example from a predicate) is re-raised on the
//! calling thread once all workers have stopped.

use crate::base::{AccountId, Money};
use crate::partition::{self, Partition};
use crate::payment::Payment;
use crate::LedgerError;
use parking_lot::Mutex;
use std::any::Any;
use std::panic;

/// Sums the amounts of `payments` using `workers` concurrent workers.
pub fn sum(payments: &[Payment], workers: usize) -> Money {
    let partitions = partition::plan(payments.len(), workers);
    tracing::debug!(
        payments = payments.len(),
        workers = partitions.len(),
        "dispatching sum workers"
    );

    let total = Mutex::new(Money::ZERO);
    run_partitions(payments, &partitions, |index, slice| {
        let local: Money = slice.iter().map(Payment::amount).sum();
        *total.lock() += local;
        tracing::trace!(partition = index, partial = %local, "merged partial sum");
    });

    let total = total.into_inner();
    tracing::debug!(%total, "sum complete");
    total
}

/// Returns the payments for which `predicate` holds.
///
/// The predicate is called concurrently from several workers and must be
/// side-effect free.
///
/// # Errors
///
/// Returns [`LedgerError::NoMatchingPayments`] if nothing matched.
pub fn filter<F>(
    payments: &[Payment],
    predicate: F,
    workers: usize,
) -> Result<Vec<Payment>, LedgerError>
where
    F: Fn(&Payment) -> bool + Sync,
{
    let partitions = partition::plan(payments.len(), workers);
    tracing::debug!(
        payments = payments.len(),
        workers = partitions.len(),
        "dispatching filter workers"
    );

    let matches = Mutex::new(Vec::new());
    run_partitions(payments, &partitions, |index, slice| {
        let local: Vec<Payment> = slice.iter().filter(|p| predicate(*p)).cloned().collect();
        let found = local.len();
        matches.lock().extend(local);
        tracing::trace!(partition = index, found, "merged partial matches");
    });

    let matches = matches.into_inner();
    tracing::debug!(matches = matches.len(), "filter complete");
    if matches.is_empty() {
        return Err(LedgerError::NoMatchingPayments);
    }
    Ok(matches)
}

/// Returns the payments owned by `account_id`.
///
/// # Errors
///
/// Returns [`LedgerError::NoMatchingPayments`] if the account has no payments.
pub fn filter_by_account(
    payments: &[Payment],
    account_id: AccountId,
    workers: usize,
) -> Result<Vec<Payment>, LedgerError> {
    filter(payments, |payment| payment.account_id == account_id, workers)
}

/// Runs `work` once per partition on its own scoped thread and joins them all.
fn run_partitions<W>(payments: &[Payment], partitions: &[Partition], work: W)
where
    W: Fn(usize, &[Payment]) + Sync,
{
    let work = &work;
    let outcome = crossbeam::scope(|scope| {
        for (index, partition) in partitions.iter().enumerate() {
            let slice = &payments[partition.range()];
            scope.spawn(move |_| work(index, slice));
        }
    });

    // crossbeam collects every worker panic into a Vec; re-raise the first one
    // so the caller sees the original payload.
    if let Err(payload) = outcome {
        let payload: Box<dyn Any + Send> = match payload.downcast::<Vec<Box<dyn Any + Send>>>() {
            Ok(mut panics) if !panics.is_empty() => panics.swap_remove(0),
            Ok(_) => Box::new("aggregation worker panicked"),
            Err(payload) => payload,
        };
        panic::resume_unwind(payload);
    }
}
