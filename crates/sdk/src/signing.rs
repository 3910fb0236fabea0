// Copyright 2025 chenjjiaa
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

//! Request body signing
//!
//! Every signed call carries `HMAC-SHA512(secret, body)` as a lowercase hex
//! string. The MAC is computed over the exact bytes that go on the wire, so
//! the body is serialized once and those same bytes are both signed and sent.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("request body serialization error: {0}")]
	Serialization(#[source] serde_json::Error),
	#[error("invalid signing key: {0}")]
	InvalidKey(String),
	#[error("invalid signature encoding: {0}")]
	InvalidSignature(String),
}

/// API credentials
///
/// The key identifies the merchant and is sent in clear with every signed
/// request. The secret never leaves the process; it is only used as the
/// HMAC key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	api_key: String,
	secret: String,
}

impl Credentials {
	pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			api_key: api_key.into(),
			secret: secret.into(),
		}
	}

	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// Serialize `payload` and sign the resulting bytes with the secret
	pub fn sign<T: Serialize>(&self, payload: &T) -> Result<SignedBody, SigningError> {
		sign_json(payload, self.secret.as_bytes())
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("api_key", &self.api_key)
			.field("secret", &"<redacted>")
			.finish()
	}
}

/// A serialized request body together with its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBody {
	/// Exact bytes to send
	pub body: Vec<u8>,
	/// Hex-encoded HMAC-SHA512 of `body`
	pub signature: String,
}

/// Compute the hex-encoded HMAC-SHA512 of `body` keyed by `secret`
pub fn sign_payload(secret: &[u8], body: &[u8]) -> Result<String, SigningError> {
	let mut mac =
		HmacSha512::new_from_slice(secret).map_err(|e| SigningError::InvalidKey(e.to_string()))?;
	mac.update(body);
	Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Serialize a request payload to compact JSON and sign it
///
/// Field order follows the payload's declaration order, so one logical
/// payload always yields the same bytes and the same signature.
pub fn sign_json<T: Serialize>(payload: &T, secret: &[u8]) -> Result<SignedBody, SigningError> {
	let body = serde_json::to_vec(payload).map_err(SigningError::Serialization)?;
	let signature = sign_payload(secret, &body)?;
	Ok(SignedBody { body, signature })
}

/// Verify a hex signature against a body
///
/// Comparison is constant-time. Upper- and lowercase hex are both accepted.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> Result<bool, SigningError> {
	let expected =
		hex::decode(signature).map_err(|e| SigningError::InvalidSignature(e.to_string()))?;

	let mut mac =
		HmacSha512::new_from_slice(secret).map_err(|e| SigningError::InvalidKey(e.to_string()))?;
	mac.update(body);
	Ok(mac.verify_slice(&expected).is_ok())
}
