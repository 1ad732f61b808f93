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

use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;
use wallet_ledger::{
    AccountId, Ledger, LedgerError, Money, PROGRESS_CHUNK_SIZE, Payment, progress,
};

/// Wallet Ledger - Run parallel aggregations over a synthetic payment ledger
///
/// Seeds a ledger with equal-sized payments spread round-robin across
/// accounts, then reports the total, one account's payments and a streamed
/// total. Set RUST_LOG=debug to watch workers being dispatched.
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Parallel aggregations over an in-memory payment ledger", long_about = None)]
struct Args {
    /// Number of payments to seed
    #[arg(long, default_value_t = 10)]
    payments: usize,

    /// Amount of every seeded payment, in minor units
    #[arg(long, default_value_t = 100)]
    amount: i64,

    /// Number of accounts the payments are spread across
    #[arg(long, default_value_t = 3)]
    accounts: i64,

    /// Worker threads for sum and filter (0 and 1 both mean one worker)
    #[arg(long, short, default_value_t = 4)]
    workers: usize,

    /// Account whose payments are listed
    #[arg(long, default_value_t = 1)]
    account: i64,

    /// Payments per streaming worker
    #[arg(long, default_value_t = PROGRESS_CHUNK_SIZE)]
    chunk_size: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let ledger = match seed_ledger(&args) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Error seeding ledger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_report(&ledger, &args, io::stdout().lock()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Builds a ledger of `args.payments` payments of `args.amount` each.
///
/// Payment `i` belongs to account `i % accounts + 1`.
fn seed_ledger(args: &Args) -> Result<Ledger, LedgerError> {
    let ledger = Ledger::new();
    let accounts = args.accounts.max(1);

    for i in 0..args.payments {
        let account_id = AccountId(i as i64 % accounts + 1);
        ledger.record(Payment::new(
            format!("pay-{i}"),
            account_id,
            Money(args.amount),
            "demo",
        ))?;
    }

    tracing::info!(payments = ledger.len(), accounts, "ledger seeded");
    Ok(ledger)
}

/// Writes the aggregation report.
///
/// # Format
///
/// ```text
/// payments: 10
/// sum (4 workers): 1000
/// account 1: 4 payments, 400
/// streamed (1 workers): 1000
/// ```
fn write_report<W: Write>(ledger: &Ledger, args: &Args, mut out: W) -> io::Result<()> {
    let account_id = AccountId(args.account);

    writeln!(out, "payments: {}", ledger.len())?;
    writeln!(
        out,
        "sum ({} workers): {}",
        args.workers,
        ledger.sum_payments(args.workers)
    )?;

    match ledger.filter_payments(account_id, args.workers) {
        Ok(found) => {
            let total: Money = found.iter().map(Payment::amount).sum();
            writeln!(out, "account {}: {} payments, {}", account_id, found.len(), total)?;
        }
        Err(e) => writeln!(out, "account {}: {}", account_id, e)?,
    }

    let stream = progress::sum_with_progress_chunked(ledger.snapshot(), args.chunk_size);
    let workers = stream.workers();
    writeln!(out, "streamed ({} workers): {}", workers, stream.total())?;

    out.flush()
}
