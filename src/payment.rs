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

//! Payment records.
//!
//! Payments are produced by the bookkeeping side of the wallet and follow a
//! simple lifecycle:
//! - [`InProgress`] → [`Ok`] once settled
//! - [`InProgress`] → [`Fail`] when rejected (the amount is refunded and zeroed)
//!
//! The aggregation engine only ever reads them.
//!
//! [`InProgress`]: PaymentStatus::InProgress
//! [`Ok`]: PaymentStatus::Ok
//! [`Fail`]: PaymentStatus::Fail

use crate::base::{AccountId, Category, Money, PaymentId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    pub amount: Money,
    pub category: Category,
    pub status: PaymentStatus,
}

impl Payment {
    /// Creates an in-progress payment.
    pub fn new(
        id: impl Into<PaymentId>,
        account_id: AccountId,
        amount: Money,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}
