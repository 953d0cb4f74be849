//! Relay HTTP client implementation.

use std::time::Duration;

use reqwest::Client;

use crate::error::{RelayError, Result};
use crate::types::{SendTransactionResponse, TransactionRequest, TransactionStatusResponse};

/// Transaction relay API client.
///
/// Submits function calls for managed signing and polls for attempt hashes.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RelayClient {
    /// Create a new relay client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the relay API (e.g., `"https://api.relay.example"`)
    /// * `api_key` - Bearer token for authentication
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Submit a transaction for signing and broadcast.
    ///
    /// Returns the relay-side transaction id. Acceptance does not imply the
    /// transaction is mined, or even broadcast yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the relay returns an error.
    pub async fn send_transaction(&self, request: &TransactionRequest) -> Result<String> {
        let url = format!("{}/transact/sendTransaction", self.base_url);

        tracing::debug!(
            contract = %request.contract_address,
            function = %request.function_signature,
            "submitting transaction to relay"
        );

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let parsed: SendTransactionResponse = Self::handle_response(response).await?;
        Ok(parsed.transaction_id)
    }

    /// Fetch the broadcast hash of a submitted transaction.
    ///
    /// Returns `Ok(None)` while no attempt has produced a hash yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the relay returns an error.
    pub async fn transaction_hash(
        &self,
        project_id: &str,
        transaction_id: &str,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/wallet/project/{project_id}/request/{transaction_id}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status: TransactionStatusResponse = Self::handle_response(response).await?;
        Ok(status.hash().map(ToString::to_string))
    }

    /// Poll for a transaction hash on a fixed budget.
    ///
    /// Checks every `delay` up to `attempts` times, returning `Ok(None)` when
    /// the budget runs out. Exhaustion means "still pending", not failure;
    /// callers reconcile the final state through event ingestion.
    ///
    /// # Errors
    ///
    /// Returns an error if a poll request fails or the relay returns an error.
    pub async fn wait_for_hash(
        &self,
        project_id: &str,
        transaction_id: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<Option<String>> {
        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(delay).await;
            }

            if let Some(hash) = self.transaction_hash(project_id, transaction_id).await? {
                return Ok(Some(hash));
            }
        }

        tracing::debug!(%transaction_id, attempts, "hash not available within poll budget");
        Ok(None)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice(&body)
                .map_err(|e| RelayError::Serialization(e.to_string()));
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP {status}"));

        Err(RelayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> TransactionRequest {
        let mut args = serde_json::Map::new();
        args.insert("from".into(), "U_FROM".into());
        args.insert("to".into(), "U_TO".into());
        args.insert("amount".into(), "1".into());

        TransactionRequest {
            chain_id: 8453,
            project_id: "proj-1".into(),
            contract_address: "0xcontract".into(),
            function_signature: "tip(string from, string to, uint256 amount)".into(),
            args,
        }
    }

    #[tokio::test]
    async fn send_transaction_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transact/sendTransaction"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "chainId": 8453,
                "contractAddress": "0xcontract",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactionId": "tx-123"
            })))
            .mount(&server)
            .await;

        let client = RelayClient::new(server.uri(), "test-key");
        let tx_id = client.send_transaction(&test_request()).await.unwrap();
        assert_eq!(tx_id, "tx-123");
    }

    #[tokio::test]
    async fn send_transaction_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transact/sendTransaction"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let client = RelayClient::new(server.uri(), "wrong-key");
        let err = client.send_transaction(&test_request()).await.unwrap_err();
        assert!(matches!(err, RelayError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn transaction_hash_none_while_pending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wallet/project/proj-1/request/tx-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactionAttempts": []
            })))
            .mount(&server)
            .await;

        let client = RelayClient::new(server.uri(), "test-key");
        let hash = client.transaction_hash("proj-1", "tx-123").await.unwrap();
        assert!(hash.is_none());
    }

    #[tokio::test]
    async fn transaction_hash_picks_first_broadcast_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wallet/project/proj-1/request/tx-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactionAttempts": [
                    {"hash": null, "status": "PENDING"},
                    {"hash": "0xabc", "status": "SUBMITTED"}
                ]
            })))
            .mount(&server)
            .await;

        let client = RelayClient::new(server.uri(), "test-key");
        let hash = client.transaction_hash("proj-1", "tx-123").await.unwrap();
        assert_eq!(hash.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn wait_for_hash_exhausts_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wallet/project/proj-1/request/tx-pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactionAttempts": [{"hash": null, "status": "PENDING"}]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = RelayClient::new(server.uri(), "test-key");
        let hash = client
            .wait_for_hash("proj-1", "tx-pending", 3, Duration::from_millis(1))
            .await
            .unwrap();
        assert!(hash.is_none());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = RelayClient::new("http://localhost:8080/", "key");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
