//! Templated contract-call tip action.
//!
//! The org configures a contract, a function signature and an arg template;
//! each tip substitutes the template placeholders and dispatches the call
//! through the relay. This is the escape hatch for orgs with their own
//! contracts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use slash_tip_core::{Organization, SendTransactionConfig};
use slash_tip_relay::{RelayClient, TransactionRequest};
use slash_tip_store::{RocksStore, Store};

use crate::actions::types::{MessageBlock, TipAction, TipParams, TipResponse, TipResult, ValidationResult};

const HASH_POLL_ATTEMPTS: u32 = 2;
const HASH_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(200);

/// Tip action that dispatches an org-configured templated transaction.
pub struct SendTransactionAction {
    store: Arc<RocksStore>,
    relay: Option<Arc<RelayClient>>,
    default_chain_id: u64,
    default_project_id: String,
}

impl SendTransactionAction {
    /// Create the action with service-level chain and project defaults.
    #[must_use]
    pub fn new(
        store: Arc<RocksStore>,
        relay: Option<Arc<RelayClient>>,
        default_chain_id: u64,
        default_project_id: String,
    ) -> Self {
        Self {
            store,
            relay,
            default_chain_id,
            default_project_id,
        }
    }

    fn config(org: &Organization) -> Option<&SendTransactionConfig> {
        org.action_config
            .as_ref()
            .and_then(|c| c.as_send_transaction())
    }

    /// The recipient's wallet address, when they are registered.
    fn recipient_address(&self, params: &TipParams) -> String {
        self.store
            .get_user(&params.org.id, &params.to_user_id)
            .ok()
            .flatten()
            .map(|user| user.address)
            .unwrap_or_default()
    }
}

/// Substitute template placeholders in an arg map.
///
/// A string value that is exactly a placeholder is replaced with the typed
/// value (the amount stays numeric); strings containing placeholders get
/// string interpolation; everything else passes through untouched.
fn interpolate_args(
    template: &Map<String, Value>,
    params: &TipParams,
    recipient_address: &str,
) -> Map<String, Value> {
    let message = params.message.clone().unwrap_or_default();
    let typed: [(&str, Value); 5] = [
        ("{{fromUserId}}", Value::from(params.from_user_id.as_str())),
        ("{{toUserId}}", Value::from(params.to_user_id.as_str())),
        ("{{amount}}", Value::from(params.amount)),
        ("{{message}}", Value::from(message.as_str())),
        ("{{recipientAddress}}", Value::from(recipient_address)),
    ];

    let mut result = Map::new();
    for (key, value) in template {
        let replaced = match value {
            Value::String(s) => {
                if let Some((_, typed_value)) = typed.iter().find(|(p, _)| p == s) {
                    typed_value.clone()
                } else if s.contains("{{") {
                    let mut interpolated = s.clone();
                    for (placeholder, typed_value) in &typed {
                        let as_text = match typed_value {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        interpolated = interpolated.replace(placeholder, &as_text);
                    }
                    Value::String(interpolated)
                } else {
                    value.clone()
                }
            }
            other => other.clone(),
        };
        result.insert(key.clone(), replaced);
    }
    result
}

#[async_trait]
impl TipAction for SendTransactionAction {
    fn action_type(&self) -> &'static str {
        "send_transaction"
    }

    async fn validate(&self, params: &TipParams) -> ValidationResult {
        let Some(config) = Self::config(&params.org) else {
            return ValidationResult::invalid("Action not configured for this organization");
        };
        if config.contract_address.is_empty() || config.function_signature.is_empty() {
            return ValidationResult::invalid("Missing contract configuration");
        }
        if params.amount <= 0 {
            return ValidationResult::invalid("Amount must be greater than 0");
        }
        ValidationResult::ok()
    }

    async fn execute(&self, params: &TipParams) -> TipResult {
        let org = &params.org;
        let Some(relay) = &self.relay else {
            tracing::error!(org = %org.id, "send_transaction requested but no relay is configured");
            return TipResult::failed("Transaction failed. Please try again.");
        };
        let Some(config) = Self::config(org) else {
            return TipResult::failed("Action not configured for this organization");
        };

        let chain_id = config.chain_id.unwrap_or(self.default_chain_id);
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| self.default_project_id.clone());
        let recipient_address = self.recipient_address(params);
        let args = interpolate_args(&config.args, params, &recipient_address);

        tracing::info!(
            org = %org.id,
            chain_id,
            contract = %config.contract_address,
            signature = %config.function_signature,
            "dispatching templated transaction"
        );

        let request = TransactionRequest {
            chain_id,
            project_id: project_id.clone(),
            contract_address: config.contract_address.clone(),
            function_signature: config.function_signature.clone(),
            args,
        };

        let transaction_id = match relay.send_transaction(&request).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(org = %org.id, error = %e, "templated transaction failed");
                return TipResult::failed("Transaction failed. Please try again.");
            }
        };

        let hash = relay
            .wait_for_hash(&project_id, &transaction_id, HASH_POLL_ATTEMPTS, HASH_POLL_INTERVAL)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(%transaction_id, error = %e, "hash poll failed");
                None
            });

        let annotation = params
            .message
            .as_deref()
            .map(|m| format!("({m})"))
            .unwrap_or_default();
        let text = config.success_message.clone().unwrap_or_else(|| {
            format!(
                "+{} {annotation}\n<@{}> ->-> <@{}>",
                params.amount, params.from_user_id, params.to_user_id
            )
        });

        TipResult::succeeded(
            hash,
            TipResponse::broadcast("").with_blocks(vec![MessageBlock::section(text)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_params(amount: i64, message: Option<&str>) -> TipParams {
        TipParams {
            org: Organization::new("acme", "Acme Inc", "T0123", "xoxb-test"),
            from_user_id: "U_FROM".into(),
            to_user_id: "U_TO".into(),
            amount,
            message: message.map(String::from),
        }
    }

    fn template(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn exact_placeholder_match_preserves_types() {
        let template = template(json!({
            "from": "{{fromUserId}}",
            "amount": "{{amount}}",
            "to": "{{recipientAddress}}"
        }));
        let args = interpolate_args(&template, &test_params(5, None), "0xabc");
        assert_eq!(args["from"], json!("U_FROM"));
        assert_eq!(args["amount"], json!(5));
        assert_eq!(args["to"], json!("0xabc"));
    }

    #[test]
    fn partial_placeholders_interpolate_as_strings() {
        let template = template(json!({
            "memo": "tip_{{amount}}_from_{{fromUserId}}"
        }));
        let args = interpolate_args(&template, &test_params(5, None), "");
        assert_eq!(args["memo"], json!("tip_5_from_U_FROM"));
    }

    #[test]
    fn non_placeholder_values_pass_through() {
        let template = template(json!({
            "fixed": "constant",
            "count": 7,
            "flag": true,
            "nested": {"inner": "{{amount}}"}
        }));
        let args = interpolate_args(&template, &test_params(5, None), "");
        assert_eq!(args["fixed"], json!("constant"));
        assert_eq!(args["count"], json!(7));
        assert_eq!(args["flag"], json!(true));
        // Interpolation is shallow, matching the template contract.
        assert_eq!(args["nested"], json!({"inner": "{{amount}}"}));
    }

    #[test]
    fn missing_message_interpolates_empty() {
        let template = template(json!({"data": "{{message}}"}));
        let args = interpolate_args(&template, &test_params(5, None), "");
        assert_eq!(args["data"], json!(""));
    }
}
