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

//! In-process mock of the processing API
//!
//! Every request is recorded and answered with a fixed status and body.

#![allow(dead_code)]

use std::{
	sync::{Arc, Mutex, Once},
	time::Duration,
};

use axum::{
	Router,
	body::Bytes,
	extract::State,
	http::{HeaderMap, Method, StatusCode, Uri, header},
	response::IntoResponse,
};
use tracing_subscriber::EnvFilter;

pub const TEST_KEY: &str = "WytPv7tNE4RHtDbERU11AzamY82j4VUz";
pub const TEST_SECRET: &str = "tvmQx3vRN1YFdmdexFQrDoB6lyNnCPpBuLl7kHEC";

static TRACING: Once = Once::new();

/// Route client events to the test output (filter with RUST_LOG)
pub fn init_tracing() {
	TRACING.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub query: Option<String>,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}

impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}
}

#[derive(Clone)]
struct MockState {
	status: StatusCode,
	body: String,
	delay: Option<Duration>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
	pub base_url: String,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
	pub async fn start(status: StatusCode, body: &str) -> Self {
		Self::start_with_delay(status, body, None).await
	}

	pub async fn start_with_delay(status: StatusCode, body: &str, delay: Option<Duration>) -> Self {
		init_tracing();

		let requests = Arc::new(Mutex::new(Vec::new()));
		let state = MockState {
			status,
			body: body.to_string(),
			delay,
			requests: requests.clone(),
		};

		let app = Router::new().fallback(record).with_state(state);

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("Failed to bind mock server");
		let addr = listener.local_addr().expect("Failed to read mock address");

		tokio::spawn(async move {
			axum::serve(listener, app).await.ok();
		});

		Self {
			base_url: format!("http://{}/api/v2", addr),
			requests,
		}
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap().clone()
	}

	pub fn last_request(&self) -> RecordedRequest {
		self.requests()
			.pop()
			.expect("mock server received no requests")
	}
}

async fn record(
	State(state): State<MockState>,
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	body: Bytes,
) -> impl IntoResponse {
	let request = RecordedRequest {
		method,
		path: uri.path().to_string(),
		query: uri.query().map(str::to_string),
		headers,
		body: body.to_vec(),
	};
	state.requests.lock().unwrap().push(request);

	if let Some(delay) = state.delay {
		tokio::time::sleep(delay).await;
	}

	(
		state.status,
		[(header::CONTENT_TYPE, "application/json")],
		state.body.clone(),
	)
}
