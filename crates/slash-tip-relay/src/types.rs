//! Request and response types for the relay API.

use serde::{Deserialize, Serialize};

/// A function call for the relay to sign and submit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Chain to submit on.
    pub chain_id: u64,

    /// Relay project owning the sending wallet.
    pub project_id: String,

    /// Target contract.
    pub contract_address: String,

    /// Solidity function signature with named parameters, e.g.
    /// `"tip(string from, string to, uint256 amount)"`.
    pub function_signature: String,

    /// Arguments keyed by parameter name.
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// Response to a submitted transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    /// Relay-side id used to poll for the hash.
    pub transaction_id: String,
}

/// One signing/broadcast attempt for a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttempt {
    /// Transaction hash of this attempt, if broadcast.
    pub hash: Option<String>,

    /// Relay-side attempt status.
    pub status: Option<String>,
}

/// Status of a submitted transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatusResponse {
    /// All attempts made so far, newest last.
    #[serde(default)]
    pub transaction_attempts: Vec<TransactionAttempt>,
}

impl TransactionStatusResponse {
    /// The first broadcast hash, if any attempt produced one.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.transaction_attempts
            .iter()
            .find_map(|attempt| attempt.hash.as_deref())
            .filter(|hash| !hash.is_empty())
    }
}
