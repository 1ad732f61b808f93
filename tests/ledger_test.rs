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

//! Ledger public API integration tests.

use std::sync::Arc;
use std::thread;
use wallet_ledger::{AccountId, Ledger, LedgerError, Money, Payment, PaymentStatus};

// === Helper Functions ===

fn make_payment(id: &str, account_id: i64, amount: i64) -> Payment {
    Payment::new(id, AccountId(account_id), Money(amount), "auto")
}

// === Recording ===

#[test]
fn new_ledger_is_empty() {
    let ledger = Ledger::new();
    assert!(ledger.is_empty());
    assert_eq!(ledger.len(), 0);
}

#[test]
fn record_appends_payment() {
    let ledger = Ledger::new();
    ledger.record(make_payment("p1", 1, 100)).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.snapshot()[0], make_payment("p1", 1, 100));
}

#[test]
fn duplicate_payment_rejected() {
    let ledger = Ledger::new();
    ledger.record(make_payment("p1", 1, 100)).unwrap();

    let result = ledger.record(make_payment("p1", 2, 50));
    assert_eq!(result, Err(LedgerError::DuplicatePayment));

    // Original payment unchanged
    assert_eq!(ledger.snapshot()[0].amount, Money(100));
}

#[test]
fn concurrent_duplicate_records_admit_exactly_one() {
    let ledger = Arc::new(Ledger::new());
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.record(make_payment("same", i, 1)).is_ok())
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .filter(|ok| *ok)
        .count();

    assert_eq!(admitted, 1);
    assert_eq!(ledger.len(), 1);
}

#[test]
fn concurrent_distinct_records_all_land() {
    let ledger = Arc::new(Ledger::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..100 {
                    ledger.record(make_payment(&format!("t{t}-{i}"), t, 1)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(ledger.len(), 800);
    assert_eq!(ledger.sum_payments(8), Money(800));
}

// === Aggregations over the Ledger ===

#[test]
fn sum_payments_over_ledger() {
    let ledger = Ledger::new();
    for i in 0..10 {
        ledger.record(make_payment(&format!("p{i}"), 1, 100)).unwrap();
    }
    assert_eq!(ledger.sum_payments(1), Money(1000));
    assert_eq!(ledger.sum_payments(3), Money(1000));
}

#[test]
fn filter_payments_by_account() {
    let ledger = Ledger::new();
    ledger.record(make_payment("a", 1, 10)).unwrap();
    ledger.record(make_payment("b", 2, 20)).unwrap();
    ledger.record(make_payment("c", 1, 30)).unwrap();

    let mut found = ledger.filter_payments(AccountId(1), 2).unwrap();
    found.sort_by(|x, y| x.id.as_str().cmp(y.id.as_str()));
    assert_eq!(found, vec![make_payment("a", 1, 10), make_payment("c", 1, 30)]);

    assert_eq!(
        ledger.filter_payments(AccountId(3), 2),
        Err(LedgerError::NoMatchingPayments)
    );
}

#[test]
fn filter_payments_by_fn_over_ledger() {
    let ledger = Ledger::new();
    ledger.record(make_payment("a", 1, 10)).unwrap();
    ledger
        .record(make_payment("b", 1, 0).with_status(PaymentStatus::Fail))
        .unwrap();
    ledger
        .record(make_payment("c", 2, 30).with_status(PaymentStatus::Ok))
        .unwrap();

    let failed = ledger
        .filter_payments_by_fn(|p| p.status == PaymentStatus::Fail, 3)
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id.as_str(), "b");

    let large = ledger.filter_payments_by_fn(|p| p.amount > Money(15), 0).unwrap();
    assert_eq!(large.len(), 1);
    assert_eq!(large[0].id.as_str(), "c");
}

#[test]
fn aggregations_see_snapshot_at_call_time() {
    let ledger = Ledger::new();
    ledger.record(make_payment("a", 1, 10)).unwrap();
    let snapshot = ledger.snapshot();
    ledger.record(make_payment("b", 1, 20)).unwrap();

    assert_eq!(wallet_ledger::engine::sum(&snapshot, 2), Money(10));
    assert_eq!(ledger.sum_payments(2), Money(30));
}

// === Serialization Shape ===

#[test]
fn payment_serializes_with_wire_status_names() {
    let payment = make_payment("p1", 7, 250).with_status(PaymentStatus::InProgress);
    let json = serde_json::to_value(&payment).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "p1",
            "account_id": 7,
            "amount": 250,
            "category": "auto",
            "status": "INPROGRESS"
        })
    );

    let ok: PaymentStatus = serde_json::from_str("\"OK\"").unwrap();
    assert_eq!(ok, PaymentStatus::Ok);
    let fail: PaymentStatus = serde_json::from_str("\"FAIL\"").unwrap();
    assert_eq!(fail, PaymentStatus::Fail);
}
