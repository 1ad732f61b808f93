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

//! # Wallet Ledger
//!
//! This library provides an in-memory payment ledger whose read side runs bulk
//! aggregations (sum, filter, streaming sum) across worker threads.
//!
//! ## Core Components
//!
//! - [`Ledger`]: Append-only payment log handing out read-only [`Snapshot`]s
//! - [`partition`]: Splits a collection into contiguous ranges, one per worker
//! - [`engine`]: Parallel sum and filter over a payment slice
//! - [`progress`]: Chunked streaming sum reporting one [`Progress`] per worker
//! - [`LedgerError`]: Error types for ledger and aggregation failures
//!
//! ## Example
//!
//! ```
//! use wallet_ledger::{AccountId, Ledger, Money, Payment};
//!
//! let ledger = Ledger::new();
//! for i in 0..10 {
//!     let account = AccountId(if i < 2 { 7 } else { 1 });
//!     ledger.record(Payment::new(format!("p{i}"), account, Money(100), "auto")).unwrap();
//! }
//!
//! assert_eq!(ledger.sum_payments(3), Money(1000));
//! assert_eq!(ledger.filter_payments(AccountId(7), 4).unwrap().len(), 2);
//! assert_eq!(ledger.sum_payments_with_progress().total(), Money(1000));
//! ```
//!
//! ## Thread Safety
//!
//! Workers own disjoint partitions of an immutable snapshot. The only shared
//! state is the merge target (a mutex-guarded accumulator or result list) or,
//! for streaming, the channel.

mod base;
pub mod engine;
pub mod error;
mod ledger;
pub mod partition;
mod payment;
pub mod progress;

pub use base::{AccountId, Category, Money, PaymentId};
pub use error::LedgerError;
pub use ledger::{Ledger, Snapshot};
pub use partition::Partition;
pub use payment::{Payment, PaymentStatus};
pub use progress::{PROGRESS_CHUNK_SIZE, Progress, ProgressStream};
