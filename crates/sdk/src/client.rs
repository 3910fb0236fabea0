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

use reqwest::{Client as ReqwestClient, Response, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::signing::Credentials;
use crate::types::{
	Address, AddressRequest, DataEnvelope, Invoice, InvoiceRequest, Withdrawal, WithdrawalRequest,
};

/// Header carrying the API key in clear
pub const KEY_HEADER: &str = "X-Processing-Key";

/// Header carrying the hex HMAC-SHA512 of the request body
pub const SIGNATURE_HEADER: &str = "X-Processing-Signature";

pub const JSON_CONTENT_TYPE: &str = "application/json";

const ADDRESSES_ENDPOINT: &str = "addresses/take";
const WITHDRAWAL_ENDPOINT: &str = "withdrawal/crypto";
const INVOICE_NEW_ENDPOINT: &str = "invoice/new";
const INVOICE_STATUS_ENDPOINT: &str = "invoice/status";

/// Client for the processing API
///
/// POST operations are signed: the JSON body is serialized once, its bytes
/// are signed with the shared secret, and the key and signature travel in
/// the `X-Processing-Key` / `X-Processing-Signature` headers. The invoice
/// status lookup is a plain GET and carries no authentication headers.
///
/// The client is cheap to clone and safe to share between tasks. Dropping an
/// operation's future aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct Client {
	base_url: Url,
	client: ReqwestClient,
	credentials: Credentials,
}

impl Client {
	/// Create a client with an injected HTTP transport and base URL
	pub fn new(
		client: ReqwestClient,
		base_url: &str,
		api_key: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self, ClientError> {
		let parsed =
			Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
		if parsed.cannot_be_a_base() {
			return Err(ClientError::InvalidUrl(format!(
				"{}: cannot be used as a base url",
				base_url
			)));
		}

		Ok(Self {
			base_url: parsed,
			client,
			credentials: Credentials::new(api_key, secret),
		})
	}

	/// Create a client against the production server with the default transport
	pub fn with_defaults(
		api_key: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self, ClientError> {
		Self::from_config(&ClientConfig::new(api_key, secret))
	}

	/// Create a client from configuration
	pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
		let client = config.build_http_client()?;
		Self::new(
			client,
			&config.base_url,
			config.api_key.clone(),
			config.secret.clone(),
		)
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	pub fn api_key(&self) -> &str {
		self.credentials.api_key()
	}

	/// Obtain a crypto address for a customer
	///
	/// `foreign_id` is the caller's own identifier for the customer; the same
	/// ID and currency yield the same address.
	pub async fn addresses(&self, foreign_id: &str, currency: &str) -> Result<Address, ClientError> {
		let request = AddressRequest {
			foreign_id: foreign_id.to_string(),
			currency: currency.to_string(),
		};

		let envelope: DataEnvelope<Address> = self.post_signed(ADDRESSES_ENDPOINT, &request).await?;
		Ok(envelope.data)
	}

	/// Withdraw cryptocurrency to a customer address
	pub async fn withdraw(
		&self,
		foreign_id: &str,
		amount: f64,
		currency: &str,
		address: &str,
	) -> Result<Withdrawal, ClientError> {
		let request = WithdrawalRequest {
			foreign_id: foreign_id.to_string(),
			amount,
			currency: currency.to_string(),
			address: address.to_string(),
		};

		let envelope: DataEnvelope<Withdrawal> =
			self.post_signed(WITHDRAWAL_ENDPOINT, &request).await?;
		Ok(envelope.data)
	}

	/// Issue a fiat-denominated invoice
	pub async fn invoice_new(&self, amount: f64, fiat_currency: &str) -> Result<Invoice, ClientError> {
		let request = InvoiceRequest {
			amount,
			fiat_currency: fiat_currency.to_string(),
		};

		self.post_signed(INVOICE_NEW_ENDPOINT, &request).await
	}

	/// Get the current status of an issued invoice
	///
	/// The remote API serves this endpoint without authentication, so no key
	/// or signature headers are sent.
	pub async fn invoice_status(&self, id: &str) -> Result<Invoice, ClientError> {
		let mut url = self.endpoint_url(INVOICE_STATUS_ENDPOINT)?;
		url.query_pairs_mut().append_pair("id", id);

		debug!("GET {}", url);

		let response = self
			.client
			.get(url)
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.send()
			.await?;

		read_response(response).await
	}

	async fn post_signed<P, T>(&self, endpoint: &str, payload: &P) -> Result<T, ClientError>
	where
		P: Serialize,
		T: DeserializeOwned,
	{
		let url = self.endpoint_url(endpoint)?;
		let signed = self.credentials.sign(payload)?;

		debug!("POST {} ({} bytes, signed)", url, signed.body.len());

		let response = self
			.client
			.post(url)
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.header(KEY_HEADER, self.credentials.api_key())
			.header(SIGNATURE_HEADER, signed.signature)
			.body(signed.body)
			.send()
			.await?;

		read_response(response).await
	}

	/// Append an endpoint's path segments to the base URL path
	fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| {
				ClientError::InvalidUrl(format!("{}: cannot be used as a base url", self.base_url))
			})?
			.pop_if_empty()
			.extend(endpoint.split('/'));
		Ok(url)
	}
}

/// Drain the body, then validate the status and decode
async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
	let status = response.status();
	let body = response.bytes().await?;

	debug!("Response {} ({} bytes)", status, body.len());

	if !status.is_success() {
		let api_error = ApiError::from_response(status, &body);
		debug!("Request rejected: {}", api_error);
		return Err(ClientError::Api(api_error));
	}

	serde_json::from_slice(&body).map_err(|source| {
		debug!("Response body does not match expected shape: {}", source);
		ClientError::Decode {
			source,
			body: String::from_utf8_lossy(&body).into_owned(),
		}
	})
}

/// Synchronous client wrapper (for compatibility)
///
/// This wraps the async client and runs it in a tokio runtime.
/// For new code, prefer using the async Client directly.
pub struct SyncClient {
	client: Client,
	runtime: tokio::runtime::Runtime,
}

impl SyncClient {
	/// Create a synchronous client against the production server
	pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> anyhow::Result<Self> {
		Self::from_client(Client::with_defaults(api_key, secret)?)
	}

	/// Wrap an existing async client
	pub fn from_client(client: Client) -> anyhow::Result<Self> {
		let runtime = tokio::runtime::Runtime::new()
			.map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;
		Ok(Self { client, runtime })
	}

	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Obtain a customer address (synchronous)
	pub fn addresses(&self, foreign_id: &str, currency: &str) -> Result<Address, ClientError> {
		self.runtime
			.block_on(self.client.addresses(foreign_id, currency))
	}

	/// Withdraw crypto (synchronous)
	pub fn withdraw(
		&self,
		foreign_id: &str,
		amount: f64,
		currency: &str,
		address: &str,
	) -> Result<Withdrawal, ClientError> {
		self.runtime
			.block_on(self.client.withdraw(foreign_id, amount, currency, address))
	}

	/// Issue an invoice (synchronous)
	pub fn invoice_new(&self, amount: f64, fiat_currency: &str) -> Result<Invoice, ClientError> {
		self.runtime
			.block_on(self.client.invoice_new(amount, fiat_currency))
	}

	/// Get invoice status (synchronous)
	pub fn invoice_status(&self, id: &str) -> Result<Invoice, ClientError> {
		self.runtime.block_on(self.client.invoice_status(id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_client(base_url: &str) -> Client {
		Client::new(ReqwestClient::new(), base_url, "key", "secret").unwrap()
	}

	#[test]
	fn test_client_creation() {
		let client = test_client("https://b2b.test.daowallet.com/api/v2");
		assert_eq!(
			client.base_url().as_str(),
			"https://b2b.test.daowallet.com/api/v2"
		);
		assert_eq!(client.api_key(), "key");
	}

	#[test]
	fn test_default_client_targets_production() {
		let client = Client::with_defaults("key", "secret").unwrap();
		assert_eq!(client.base_url().as_str(), crate::config::DEFAULT_BASE_URL);
	}

	#[test]
	fn test_invalid_base_url() {
		let err = Client::new(ReqwestClient::new(), "not a url", "key", "secret").unwrap_err();
		assert!(matches!(err, ClientError::InvalidUrl(_)));
		assert!(err.is_local());

		let err = Client::new(ReqwestClient::new(), "mailto:ops@example.com", "key", "secret")
			.unwrap_err();
		assert!(matches!(err, ClientError::InvalidUrl(_)));
	}

	#[test]
	fn test_endpoint_url_joins_path() {
		let client = test_client("https://b2b.daowallet.com/api/v2");
		assert_eq!(
			client.endpoint_url(ADDRESSES_ENDPOINT).unwrap().as_str(),
			"https://b2b.daowallet.com/api/v2/addresses/take"
		);

		let client = test_client("https://b2b.daowallet.com/api/v2/");
		assert_eq!(
			client.endpoint_url(WITHDRAWAL_ENDPOINT).unwrap().as_str(),
			"https://b2b.daowallet.com/api/v2/withdrawal/crypto"
		);

		let client = test_client("http://127.0.0.1:8080");
		assert_eq!(
			client.endpoint_url(INVOICE_NEW_ENDPOINT).unwrap().as_str(),
			"http://127.0.0.1:8080/invoice/new"
		);
	}

	#[test]
	fn test_debug_redacts_secret() {
		let client = Client::new(
			ReqwestClient::new(),
			"https://b2b.daowallet.com/api/v2",
			"key",
			"do-not-print-me",
		)
		.unwrap();
		assert!(!format!("{:?}", client).contains("do-not-print-me"));
	}

	#[test]
	fn test_client_is_shareable() {
		fn assert_send_sync<T: Send + Sync + Clone>() {}
		assert_send_sync::<Client>();
	}

	#[test]
	fn test_sync_client_creation() {
		let client = SyncClient::new("key", "secret");
		assert!(client.is_ok());
	}
}
