//! Deployment kickoff endpoint.
//!
//! Writes the org's pending action config, submits the factory call and
//! returns immediately; the detached reconciliation task and the indexer
//! webhook finish the job.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use slash_tip_core::{ActionConfig, ActionType, MintConfig};
use slash_tip_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::handlers::orgs::require_org;
use crate::state::AppState;

/// Per-variant deployment parameters.
#[derive(Debug, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum DeployRequest {
    /// Deploy the ERC1155 setup.
    Erc1155Mint {
        /// Token id minted per tip.
        #[serde(default)]
        token_id: u64,
        /// Token metadata base URI.
        base_uri: String,
        /// Contract-level metadata URI.
        contract_uri: String,
    },

    /// Deploy the ERC20 setup.
    Erc20Mint {
        /// Token name.
        token_name: String,
        /// Token symbol.
        token_symbol: String,
        /// Token decimals.
        #[serde(default = "default_decimals")]
        decimals: u32,
    },

    /// Deploy the ERC20 vault setup over an existing token.
    Erc20Vault {
        /// Existing token contract address.
        token_address: String,
        /// Vault manager address.
        vault_manager_address: String,
        /// Token decimals used for amount scaling.
        #[serde(default = "default_decimals")]
        decimals: u32,
    },
}

const fn default_decimals() -> u32 {
    18
}

/// Kick off a contract deployment for the org.
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    _auth: ServiceAuth,
    Json(request): Json<DeployRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(chain) = &state.chain else {
        return Err(ApiError::ExternalService(
            "transaction relay is not configured".into(),
        ));
    };

    let mut org = require_org(&state, &slug)?;

    let (action_type, config) = match &request {
        DeployRequest::Erc1155Mint { token_id, .. } => (
            ActionType::Erc1155Mint,
            ActionConfig::Erc1155Mint(MintConfig {
                token_id: *token_id,
                ..MintConfig::default()
            }),
        ),
        DeployRequest::Erc20Mint { decimals, .. } => (
            ActionType::Erc20Mint,
            ActionConfig::Erc20Mint(MintConfig {
                decimals: Some(*decimals),
                ..MintConfig::default()
            }),
        ),
        DeployRequest::Erc20Vault { decimals, .. } => (
            ActionType::Erc20Vault,
            ActionConfig::Erc20Vault(MintConfig {
                decimals: Some(*decimals),
                ..MintConfig::default()
            }),
        ),
    };

    org.set_action(action_type, Some(config))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.store.put_org(&org)?;

    match &request {
        DeployRequest::Erc1155Mint {
            token_id,
            base_uri,
            contract_uri,
        } => {
            chain
                .deploy_erc1155(&org, *token_id, base_uri, contract_uri)
                .await
        }
        DeployRequest::Erc20Mint {
            token_name,
            token_symbol,
            decimals,
        } => chain.deploy_erc20(&org, token_name, token_symbol, *decimals).await,
        DeployRequest::Erc20Vault {
            token_address,
            vault_manager_address,
            ..
        } => {
            chain
                .deploy_erc20_vault(&org, token_address, vault_manager_address)
                .await
        }
    }
    .map_err(|e| match e {
        crate::chain::ChainError::NotConfigured(what) => {
            ApiError::BadRequest(format!("missing deployment configuration: {what}"))
        }
        other => ApiError::ExternalService(other.to_string()),
    })?;

    tracing::info!(org = %org.id, action = %action_type, "deployment submitted");
    Ok(Json(serde_json::json!({ "status": "submitted" })))
}

/// Set the action config directly for the non-deploying strategies
/// (`send_transaction`, `poem`).
pub async fn configure_action(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    _auth: ServiceAuth,
    Json(config): Json<ActionConfig>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let action_type = config.action_type();
    if config.as_mint().is_some() {
        return Err(ApiError::BadRequest(
            "mint-style actions are configured through the deploy endpoint".into(),
        ));
    }

    let mut org = require_org(&state, &slug)?;
    org.set_action(action_type, Some(config))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.store.put_org(&org)?;

    tracing::info!(org = %org.id, action = %action_type, "action configured");
    Ok(Json(serde_json::json!({ "status": "configured" })))
}
