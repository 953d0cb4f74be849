//! User registration endpoint.
//!
//! The Slack bot forwards `/register <address>` here. Registration is
//! store-first: the user row is written immediately so tips work, and the
//! on-chain registration is fired afterwards when contracts exist, tolerating
//! relay absence and failures.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use slash_tip_core::User;
use slash_tip_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// A forwarded `/register` invocation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Slack team id identifying the org.
    pub team_id: String,

    /// Slack user id to register.
    pub user_id: String,

    /// Display nickname.
    pub nickname: String,

    /// Wallet address tips are delivered to.
    pub address: String,
}

/// Registration outcome.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The registered user's id.
    pub user_id: String,

    /// The user's current allowance.
    pub allowance: i64,

    /// On-chain registration hash, when observed in time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Register a user in the caller's org.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if request.address.is_empty() {
        return Err(ApiError::BadRequest("address is required".into()));
    }

    let org = state
        .store
        .get_org_by_team_id(&request.team_id)?
        .ok_or_else(|| ApiError::NotFound(format!("organization for team {}", request.team_id)))?;

    // Re-registering updates the address and nickname but never refills the
    // allowance mid-day.
    let allowance = state
        .store
        .get_user(&org.id, &request.user_id)?
        .map_or(org.daily_allowance, |existing| existing.allowance);

    let user = User::new(
        org.id,
        &request.user_id,
        &request.nickname,
        &request.address,
        allowance,
    );
    state.store.upsert_user(&user)?;

    let mut tx_hash = None;
    if let Some(chain) = &state.chain {
        if let Some(contracts) = state.store.get_org_contracts(&org.id)? {
            match chain
                .register_user(
                    &contracts.user_registry_address,
                    &request.user_id,
                    &request.nickname,
                    &request.address,
                    allowance,
                )
                .await
            {
                Ok(hash) => tx_hash = hash,
                Err(e) => {
                    tracing::warn!(org = %org.id, user = %request.user_id, error = %e, "on-chain registration failed");
                }
            }
        }
    }

    tracing::info!(org = %org.id, user = %request.user_id, "user registered");
    Ok(Json(RegisterResponse {
        user_id: request.user_id,
        allowance,
        tx_hash,
    }))
}

/// Remove a user from the caller's org.
pub async fn unregister_user(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Json(request): Json<UnregisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org = state
        .store
        .get_org_by_team_id(&request.team_id)?
        .ok_or_else(|| ApiError::NotFound(format!("organization for team {}", request.team_id)))?;

    state.store.remove_user(&org.id, &request.user_id)?;
    tracing::info!(org = %org.id, user = %request.user_id, "user removed");
    Ok(Json(serde_json::json!({ "removed": true })))
}

/// A user removal request.
#[derive(Debug, Deserialize)]
pub struct UnregisterRequest {
    /// Slack team id identifying the org.
    pub team_id: String,

    /// Slack user id to remove.
    pub user_id: String,
}
