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

use std::{fmt, time::Duration};

use reqwest::Client as ReqwestClient;
use serde::Deserialize;

use crate::error::ClientError;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://b2b.daowallet.com/api/v2";

/// Environment variable prefix used by `ClientConfig::from_env`
pub const ENV_PREFIX: &str = "DAOWALLET";

// Transport configuration constants
/// Default TCP connect + TLS handshake timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default timeout waiting for response bytes in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 3;

/// Default overall request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10 * 60;

/// Default TCP keep-alive interval in seconds
pub const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 10;

/// Default idle time before a pooled connection is closed, in seconds
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 10;

/// Client configuration
///
/// Only the credentials are required; everything else falls back to the
/// defaults above.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
	#[serde(default = "default_base_url")]
	pub base_url: String,
	pub api_key: String,
	pub secret: String,
	#[serde(default = "default_connect_timeout_secs")]
	pub connect_timeout_secs: u64,
	#[serde(default = "default_read_timeout_secs")]
	pub read_timeout_secs: u64,
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
	#[serde(default = "default_tcp_keepalive_secs")]
	pub tcp_keepalive_secs: u64,
	#[serde(default = "default_pool_idle_timeout_secs")]
	pub pool_idle_timeout_secs: u64,
}

fn default_base_url() -> String {
	DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
	DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_read_timeout_secs() -> u64 {
	DEFAULT_READ_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_tcp_keepalive_secs() -> u64 {
	DEFAULT_TCP_KEEPALIVE_SECS
}

fn default_pool_idle_timeout_secs() -> u64 {
	DEFAULT_POOL_IDLE_TIMEOUT_SECS
}

impl ClientConfig {
	/// Configuration against the production server with default timeouts
	pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			base_url: default_base_url(),
			api_key: api_key.into(),
			secret: secret.into(),
			connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
			read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
			tcp_keepalive_secs: DEFAULT_TCP_KEEPALIVE_SECS,
			pool_idle_timeout_secs: DEFAULT_POOL_IDLE_TIMEOUT_SECS,
		}
	}

	/// Point the configuration at another server (e.g., a sandbox)
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Load configuration from `DAOWALLET_*` environment variables
	///
	/// A `.env` file in the working directory is honoured. `DAOWALLET_API_KEY`
	/// and `DAOWALLET_SECRET` are required.
	pub fn from_env() -> Result<Self, config::ConfigError> {
		dotenv::dotenv().ok();

		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix(ENV_PREFIX))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file, with `DAOWALLET_*` overrides on top
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix(ENV_PREFIX))
			.build()?;

		cfg.try_deserialize()
	}

	pub fn connect_timeout(&self) -> Duration {
		Duration::from_secs(self.connect_timeout_secs)
	}

	pub fn read_timeout(&self) -> Duration {
		Duration::from_secs(self.read_timeout_secs)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// Build the HTTP transport described by this configuration
	pub fn build_http_client(&self) -> Result<ReqwestClient, ClientError> {
		ReqwestClient::builder()
			.connect_timeout(self.connect_timeout())
			.read_timeout(self.read_timeout())
			.timeout(self.request_timeout())
			.tcp_keepalive(Duration::from_secs(self.tcp_keepalive_secs))
			.pool_idle_timeout(Duration::from_secs(self.pool_idle_timeout_secs))
			.build()
			.map_err(ClientError::HttpClient)
	}
}

impl fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientConfig")
			.field("base_url", &self.base_url)
			.field("api_key", &self.api_key)
			.field("secret", &"<redacted>")
			.field("connect_timeout_secs", &self.connect_timeout_secs)
			.field("read_timeout_secs", &self.read_timeout_secs)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.field("tcp_keepalive_secs", &self.tcp_keepalive_secs)
			.field("pool_idle_timeout_secs", &self.pool_idle_timeout_secs)
			.finish()
	}
}
