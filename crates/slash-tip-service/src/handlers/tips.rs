//! The tip dispatch endpoint.
//!
//! The Slack bot forwards each `/tip` invocation here. The handler resolves
//! the org, picks the configured strategy, validates and executes. Validation
//! and execution failures are 200s carrying a private Slack message; only
//! missing orgs and transport-level problems surface as HTTP errors.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use slash_tip_store::Store;

use crate::actions::{TipParams, TipResponse, TipResult};
use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// A forwarded `/tip` invocation.
#[derive(Debug, Deserialize)]
pub struct TipRequest {
    /// Slack team id identifying the org.
    pub team_id: String,

    /// Sender's Slack user id.
    pub from_user_id: String,

    /// Recipient's Slack user id.
    pub to_user_id: String,

    /// Amount as entered, signed.
    pub amount: i64,

    /// Optional message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Dispatch a tip through the org's configured action.
pub async fn dispatch_tip(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Json(request): Json<TipRequest>,
) -> Result<Json<TipResult>, ApiError> {
    let org = state
        .store
        .get_org_by_team_id(&request.team_id)?
        .ok_or_else(|| ApiError::NotFound(format!("organization for team {}", request.team_id)))?;

    let Some(action_type) = org.action_type else {
        return Ok(Json(TipResult {
            success: false,
            tx_hash: None,
            response: TipResponse::private(
                "Tipping is not set up for this workspace yet. An admin needs to finish setup first.",
            ),
        }));
    };

    let action = state
        .registry
        .get(action_type.as_str())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let params = TipParams {
        org,
        from_user_id: request.from_user_id,
        to_user_id: request.to_user_id,
        amount: request.amount,
        message: request.message,
    };

    let validation = action.validate(&params).await;
    if !validation.valid {
        let text = validation
            .error
            .unwrap_or_else(|| "That tip is not allowed.".to_string());
        return Ok(Json(TipResult {
            success: false,
            tx_hash: None,
            response: TipResponse::private(text),
        }));
    }

    let result = action.execute(&params).await;
    tracing::info!(
        team_id = %request.team_id,
        action = action.action_type(),
        success = result.success,
        "tip dispatched"
    );
    Ok(Json(result))
}
