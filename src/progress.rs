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

//! Streaming sum with progress reporting.
//!
//! The snapshot is cut into fixed-size chunks (see [`partition::chunks`]) and
//! each chunk is summed on its own thread. Every worker sends exactly one
//! [`Progress`] message with the partial sum of its chunk. A supervisor thread
//! joins the workers and then drops the last sender, which closes the stream.
//!
//! Messages arrive in completion order, not chunk order.
//!
//! ```
//! use wallet_ledger::{progress, AccountId, Money, Payment, Snapshot};
//!
//! let snapshot: Snapshot = (0..10)
//!     .map(|i| Payment::new(format!("p{i}"), AccountId(1), Money(100), "auto"))
//!     .collect();
//!
//! let stream = progress::sum_with_progress_chunked(snapshot, 4);
//! assert_eq!(stream.workers(), 3);
//! assert_eq!(stream.total(), Money(1000));
//! ```

use crate::base::Money;
use crate::ledger::Snapshot;
use crate::partition;
use crate::payment::Payment;
use crossbeam::channel::{self, Receiver};
use std::thread;

/// Number of payments summed by one streaming worker.
pub const PROGRESS_CHUNK_SIZE: usize = 1_000_000;

/// Partial sum reported by one streaming worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Index of the chunk this worker summed.
    pub part: usize,
    pub result: Money,
}

/// Receiving end of a streaming sum.
///
/// Yields one [`Progress`] per worker and ends once every worker has reported.
/// Iterating after the end keeps returning `None`.
#[derive(Debug)]
pub struct ProgressStream {
    receiver: Receiver<Progress>,
    workers: usize,
}

impl ProgressStream {
    /// Number of workers dispatched, and so the number of messages to expect.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Drains the stream and adds up every partial sum.
    pub fn total(self) -> Money {
        self.map(|progress| progress.result).sum()
    }
}

impl Iterator for ProgressStream {
    type Item = Progress;

    fn next(&mut self) -> Option<Progress> {
        self.receiver.recv().ok()
    }
}

/// Sums `snapshot` in chunks of [`PROGRESS_CHUNK_SIZE`], streaming each partial.
pub fn sum_with_progress(snapshot: Snapshot) -> ProgressStream {
    sum_with_progress_chunked(snapshot, PROGRESS_CHUNK_SIZE)
}

/// Like [`sum_with_progress`] with an explicit chunk size.
///
/// Dispatches `max(1, ceil(len / chunk_size))` workers; an empty snapshot
/// still produces a single zero-valued message.
pub fn sum_with_progress_chunked(snapshot: Snapshot, chunk_size: usize) -> ProgressStream {
    let chunks = partition::chunks(snapshot.len(), chunk_size);
    let workers = chunks.len();
    tracing::debug!(
        payments = snapshot.len(),
        workers,
        chunk_size,
        "dispatching streaming sum workers"
    );

    let (sender, receiver) = channel::unbounded();

    let handles: Vec<_> = chunks
        .into_iter()
        .enumerate()
        .map(|(part, chunk)| {
            let snapshot = snapshot.clone();
            let sender = sender.clone();
            thread::spawn(move || {
                let result: Money = snapshot[chunk.range()].iter().map(Payment::amount).sum();
                // The consumer may have dropped the stream; nobody is left to tell.
                let _ = sender.send(Progress { part, result });
            })
        })
        .collect();

    thread::spawn(move || {
        // Workers only slice within bounds and add with wrapping arithmetic,
        // so every join succeeds and every worker has sent its message.
        for handle in handles {
            let _ = handle.join();
        }
        // Last sender: dropping it closes the stream.
        drop(sender);
        tracing::debug!("streaming sum complete");
    });

    ProgressStream { receiver, workers }
}
