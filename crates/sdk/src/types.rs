// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

/// Largest magnitude at which every integer is exactly representable in an f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Customer crypto address allocated by the processing server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
	/// Server-assigned address ID
	pub id: i64,
	/// Address string
	pub address: String,
	/// Currency code (e.g., "BTC")
	pub currency: String,
	/// Caller-supplied foreign ID
	pub foreign_id: String,
	/// Destination tag for tagged-ledger currencies, empty otherwise
	#[serde(default)]
	pub tag: String,
}

impl Address {
	/// Destination tag, if the currency uses one
	pub fn tag(&self) -> Option<&str> {
		if self.tag.is_empty() {
			None
		} else {
			Some(&self.tag)
		}
	}
}

/// Withdrawal operation info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
	pub foreign_id: String,
	/// Operation type label (e.g., "withdrawal")
	#[serde(rename = "type")]
	pub operation_type: String,
	pub amount: f64,
	pub sender_currency: String,
	pub receiver_currency: String,
}

/// Issued invoice
///
/// The status changes server-side over time; a value of this type is a
/// snapshot taken when the invoice was created or polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
	pub foreign_id: String,
	/// Status label (e.g., "created")
	pub status: String,
	pub expired_at: DateTime<Utc>,
	pub client_amount: f64,
	pub client_currency: String,
	/// Payment options, in the order returned by the server
	#[serde(default)]
	pub addresses: Vec<InvoiceAddress>,
}

impl Invoice {
	/// Whether the invoice has expired at `now`
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now >= self.expired_at
	}

	/// Payment option for a crypto currency (case-insensitive)
	pub fn payment_option(&self, crypto_currency: &str) -> Option<&InvoiceAddress> {
		self.addresses
			.iter()
			.find(|a| a.crypto_currency.eq_ignore_ascii_case(crypto_currency))
	}
}

/// One crypto payment option of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAddress {
	pub address: String,
	pub expected_amount: f64,
	pub crypto_currency: String,
	pub rate_usd: f64,
	pub rate_eur: f64,
}

/// `{"data": ...}` wrapper used by the address and withdrawal endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
	pub data: T,
}

/// Request to allocate a customer address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressRequest {
	pub foreign_id: String,
	pub currency: String,
}

/// Request to withdraw crypto to an external address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRequest {
	pub foreign_id: String,
	#[serde(serialize_with = "serialize_amount")]
	pub amount: f64,
	pub currency: String,
	pub address: String,
}

/// Request to issue a fiat-denominated invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRequest {
	#[serde(serialize_with = "serialize_amount")]
	pub amount: f64,
	pub fiat_currency: String,
}

/// Render an amount as a JSON number
///
/// Integral values are written without a fractional part (`1250`, not
/// `1250.0`). Non-finite values are rejected instead of degrading to `null`.
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
	if !amount.is_finite() {
		return Err(S::Error::custom(format!(
			"amount must be a finite number, got {}",
			amount
		)));
	}

	if amount.fract() == 0.0 && amount.abs() < MAX_EXACT_INTEGER {
		serializer.serialize_i64(*amount as i64)
	} else {
		serializer.serialize_f64(*amount)
	}
}
