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

//! Error types for client operations
//!
//! Failures fall into four groups, each a distinct `ClientError` variant:
//!
//! - **Local**: malformed base URL, transport construction, body serialization
//! - **Transport**: DNS, TLS, connection, timeout, reading the body
//! - **Remote rejection**: any status outside 200-299, carrying [`ApiError`]
//! - **Response shape**: a 2xx body that does not match the expected type

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::signing::SigningError;

/// Error envelope returned by the API for non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiError {
	/// Status code reported in the body, or the HTTP status code if absent
	pub status_code: u16,
	/// Human-readable message
	pub message: String,
	/// Short error category (e.g., "Bad Request")
	pub error: String,
	/// HTTP status line (e.g., "400 Bad Request")
	pub status: String,
	/// Raw response body
	pub body: String,
}

/// Wire shape of the error body
#[derive(Deserialize)]
struct ErrorBody {
	#[serde(rename = "statusCode")]
	status_code: Option<u16>,
	#[serde(default)]
	message: Option<ErrorMessage>,
	#[serde(default)]
	error: Option<String>,
}

/// Validation failures report `message` as a list
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
	Single(String),
	Many(Vec<String>),
}

impl ErrorMessage {
	fn into_string(self) -> String {
		match self {
			ErrorMessage::Single(message) => message,
			ErrorMessage::Many(messages) => messages.join("; "),
		}
	}
}

impl ApiError {
	/// Build the envelope from a rejected response
	///
	/// Decoding is best-effort: a body that is not the expected JSON leaves
	/// only the status code and status line populated.
	pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
		let mut api_error = ApiError {
			status_code: status.as_u16(),
			status: status.to_string(),
			body: String::from_utf8_lossy(body).into_owned(),
			..Default::default()
		};

		if let Ok(decoded) = serde_json::from_slice::<ErrorBody>(body) {
			if let Some(code) = decoded.status_code {
				api_error.status_code = code;
			}
			api_error.message = decoded
				.message
				.map(ErrorMessage::into_string)
				.unwrap_or_default();
			api_error.error = decoded.error.unwrap_or_default();
		}

		api_error
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let detail = if self.message.is_empty() {
			&self.error
		} else {
			&self.message
		};

		if detail.is_empty() {
			write!(f, "{}", self.status)
		} else {
			write!(f, "{} ({})", detail, self.status)
		}
	}
}

impl std::error::Error for ApiError {}

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("invalid base url: {0}")]
	InvalidUrl(String),
	#[error("http client creation error: {0}")]
	HttpClient(#[source] reqwest::Error),
	#[error(transparent)]
	Signing(#[from] SigningError),
	#[error("request error: {0}")]
	Transport(#[from] reqwest::Error),
	#[error(transparent)]
	Api(#[from] ApiError),
	#[error("response unmarshaling error: {source}")]
	Decode {
		#[source]
		source: serde_json::Error,
		body: String,
	},
}

impl ClientError {
	/// The remote error envelope, if the server rejected the call
	pub fn api_error(&self) -> Option<&ApiError> {
		match self {
			ClientError::Api(api_error) => Some(api_error),
			_ => None,
		}
	}

	pub fn is_api(&self) -> bool {
		matches!(self, ClientError::Api(_))
	}

	pub fn is_transport(&self) -> bool {
		matches!(self, ClientError::Transport(_))
	}

	pub fn is_decode(&self) -> bool {
		matches!(self, ClientError::Decode { .. })
	}

	/// Raised before any request left the process
	pub fn is_local(&self) -> bool {
		matches!(
			self,
			ClientError::InvalidUrl(_) | ClientError::HttpClient(_) | ClientError::Signing(_)
		)
	}

	/// Transport-level timeout (connect, read, or overall request)
	pub fn is_timeout(&self) -> bool {
		match self {
			ClientError::Transport(e) => e.is_timeout(),
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_message_with_status_line() {
		let body = br#"{"statusCode":400,"message":"invalid currency","error":"Bad Request"}"#;
		let api_error = ApiError::from_response(StatusCode::BAD_REQUEST, body);

		assert_eq!(api_error.status_code, 400);
		assert_eq!(api_error.message, "invalid currency");
		assert_eq!(api_error.error, "Bad Request");
		assert_eq!(api_error.status, "400 Bad Request");
		assert_eq!(api_error.to_string(), "invalid currency (400 Bad Request)");

		let err = ClientError::from(api_error);
		assert_eq!(err.to_string(), "invalid currency (400 Bad Request)");
		assert!(err.is_api());
		assert!(!err.is_local());
	}

	#[test]
	fn test_non_json_body_falls_back_to_status_line() {
		let api_error =
			ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>upstream down</html>");

		assert_eq!(api_error.status_code, 502);
		assert!(api_error.message.is_empty());
		assert!(api_error.error.is_empty());
		assert_eq!(api_error.body, "<html>upstream down</html>");
		assert_eq!(api_error.to_string(), "502 Bad Gateway");
	}

	#[test]
	fn test_error_field_used_without_message() {
		let api_error = ApiError::from_response(StatusCode::UNAUTHORIZED, br#"{"error":"Unauthorized"}"#);

		assert_eq!(api_error.status_code, 401);
		assert_eq!(api_error.to_string(), "Unauthorized (401 Unauthorized)");
	}

	#[test]
	fn test_message_list_is_joined() {
		let body = br#"{"statusCode":422,"message":["amount must be positive","currency is required"],"error":"Unprocessable Entity"}"#;
		let api_error = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);

		assert_eq!(
			api_error.message,
			"amount must be positive; currency is required"
		);
	}

	#[test]
	fn test_body_status_code_takes_precedence() {
		let body = br#"{"statusCode":403,"message":"key disabled"}"#;
		let api_error = ApiError::from_response(StatusCode::BAD_REQUEST, body);

		assert_eq!(api_error.status_code, 403);
		assert_eq!(api_error.status, "400 Bad Request");
	}

	#[test]
	fn test_decode_error_is_distinct() {
		let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err = ClientError::Decode {
			source,
			body: "{".to_string(),
		};

		assert!(err.is_decode());
		assert!(!err.is_api());
		assert!(err.api_error().is_none());
		assert!(err.to_string().starts_with("response unmarshaling error"));
	}
}
