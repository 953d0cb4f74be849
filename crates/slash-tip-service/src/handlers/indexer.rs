//! Indexer webhook.
//!
//! The chain indexer delivers batches of events here. Delivery is
//! at-least-once and unordered; every event application is idempotent, so the
//! handler just verifies the signature and feeds the batch to the ingestor.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use slash_tip_indexer::{ChainEvent, IngestError, Outcome};

use crate::crypto;
use crate::error::ApiError;
use crate::state::AppState;

/// A webhook delivery batch.
#[derive(Debug, Deserialize)]
struct EventBatch {
    events: Vec<ChainEvent>,
}

/// Handle an indexer webhook delivery.
pub async fn handle_indexer_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(secret) = &state.config.indexer_webhook_secret {
        let signature = headers
            .get("x-indexer-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::BadRequest("missing x-indexer-signature header".into()))?;

        let expected = crypto::hmac_sha256_hex(secret, &body);
        if !crypto::constant_time_eq(signature, &expected) {
            tracing::warn!("indexer webhook signature mismatch");
            return Err(ApiError::Unauthorized);
        }
    }

    let batch: EventBatch = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid event batch: {e}")))?;

    let mut applied = 0;
    let mut skipped = 0;
    for event in &batch.events {
        match state.ingestor.handle(event) {
            Ok(Outcome::Applied) => applied += 1,
            Ok(Outcome::Skipped(reason)) => {
                tracing::debug!(event = event.name(), %reason, "event skipped");
                skipped += 1;
            }
            Err(IngestError::Store(e)) => return Err(e.into()),
        }
    }

    tracing::info!(applied, skipped, total = batch.events.len(), "indexer batch processed");
    Ok(Json(serde_json::json!({
        "received": true,
        "applied": applied,
        "skipped": skipped,
    })))
}
