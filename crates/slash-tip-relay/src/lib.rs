//! HTTP client for the managed transaction relay.
//!
//! The relay accepts function calls by signature, signs and submits them from
//! managed wallets, and exposes the resulting attempt hashes for polling.
//! Submission and confirmation are deliberately decoupled: a successful
//! [`RelayClient::send_transaction`] means the relay accepted the request,
//! not that the transaction is mined. Callers that need the hash poll with
//! [`RelayClient::wait_for_hash`] on a fixed budget and treat exhaustion as
//! "still pending", reconciling later through event ingestion.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::RelayClient;
pub use error::{RelayError, Result};
pub use types::{TransactionAttempt, TransactionRequest, TransactionStatusResponse};
