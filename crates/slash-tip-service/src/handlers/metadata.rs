//! Token metadata endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use slash_tip_core::TokenMetadata;
use slash_tip_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::handlers::orgs::require_org;
use crate::state::AppState;

/// Body for the metadata upsert.
#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    /// Token name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Optional image URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Display decimals.
    #[serde(default)]
    pub decimals: u32,

    /// Arbitrary extra properties.
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
}

/// Upsert display metadata for one of the org's tokens.
pub async fn put_metadata(
    State(state): State<Arc<AppState>>,
    Path((slug, token_id)): Path<(String, u64)>,
    _auth: ServiceAuth,
    Json(request): Json<MetadataRequest>,
) -> Result<Json<TokenMetadata>, ApiError> {
    if request.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let org = require_org(&state, &slug)?;
    let mut metadata = TokenMetadata::new(org.id, token_id, &request.name);
    metadata.description = request.description;
    metadata.image = request.image;
    metadata.decimals = request.decimals;
    metadata.properties = request.properties;

    state.store.upsert_token_metadata(&metadata)?;
    let stored = state
        .store
        .get_token_metadata(&org.id, token_id)?
        .ok_or_else(|| ApiError::Internal("metadata missing after upsert".into()))?;
    Ok(Json(stored))
}

/// Fetch display metadata for one of the org's tokens.
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path((slug, token_id)): Path<(String, u64)>,
) -> Result<Json<TokenMetadata>, ApiError> {
    let org = require_org(&state, &slug)?;
    let metadata = state
        .store
        .get_token_metadata(&org.id, token_id)?
        .ok_or_else(|| ApiError::NotFound(format!("metadata for token {token_id}")))?;
    Ok(Json(metadata))
}
