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

//! Partition planning.
//!
//! Splits `n` records into contiguous, non-overlapping half-open ranges whose
//! union is exactly `[0, n)`. Two plans are offered:
//!
//! - [`plan`]: a fixed number of workers; every partition has `n / workers`
//!   records except the last, which absorbs the remainder.
//! - [`chunks`]: a fixed chunk size; the number of workers follows from it.
//!
//! ```
//! use wallet_ledger::partition::{plan, Partition};
//!
//! assert_eq!(
//!     plan(10, 3),
//!     vec![Partition::new(0, 3), Partition::new(3, 6), Partition::new(6, 10)]
//! );
//! ```

use std::ops::Range;

/// A half-open index range `[start, end)` assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "partition start {start} is past end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Plans `workers` partitions over `n` records.
///
/// `workers <= 1` yields the single partition `[0, n)`. Otherwise the first
/// `workers - 1` partitions hold `n / workers` records each and the last one
/// holds the rest, so nothing is dropped when `n` is not evenly divisible.
/// When `n < workers` the leading partitions are empty.
pub fn plan(n: usize, workers: usize) -> Vec<Partition> {
    if workers <= 1 {
        return vec![Partition::new(0, n)];
    }

    let count = n / workers;
    let mut partitions = Vec::with_capacity(workers);
    for i in 0..workers - 1 {
        partitions.push(Partition::new(i * count, (i + 1) * count));
    }
    partitions.push(Partition::new((workers - 1) * count, n));
    partitions
}

/// Number of fixed-size chunks needed to cover `n` records, never less than one.
pub fn chunk_count(n: usize, chunk_size: usize) -> usize {
    n.div_ceil(chunk_size.max(1)).max(1)
}

/// Splits `n` records into chunks of `chunk_size`; the final chunk may be short.
///
/// An empty input still yields one (empty) chunk. A `chunk_size` of zero is
/// treated as one.
pub fn chunks(n: usize, chunk_size: usize) -> Vec<Partition> {
    let chunk_size = chunk_size.max(1);
    (0..chunk_count(n, chunk_size))
        .map(|i| Partition::new((i * chunk_size).min(n), ((i + 1) * chunk_size).min(n)))
        .collect()
}
