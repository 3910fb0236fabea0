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

//! DAOWallet SDK - Client library for the DAOWallet processing API
//!
//! This crate provides a typed client for the four processing operations
//! (customer addresses, crypto withdrawals, invoice issuing and invoice
//! status), the request/response structures, and the HMAC-SHA512 body
//! signing the API requires.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No retries, caching or rate limiting
//! - No environment or configuration loading unless `ClientConfig::from_env` is called
//!
//! ```no_run
//! # async fn run() -> Result<(), daowallet_sdk::ClientError> {
//! let client = daowallet_sdk::Client::with_defaults("api-key", "secret")?;
//! let address = client.addresses("user-1250", "BTC").await?;
//! println!("deposit to {}", address.address);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod types;

pub use client::{Client, JSON_CONTENT_TYPE, KEY_HEADER, SIGNATURE_HEADER, SyncClient};
pub use config::ClientConfig;
pub use error::{ApiError, ClientError};
pub use signing::{Credentials, SignedBody, SigningError, sign_json, sign_payload, verify_signature};
pub use types::*;
