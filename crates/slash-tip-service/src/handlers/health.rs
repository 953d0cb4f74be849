//! Health check endpoint.

use axum::Json;
use serde_json::{json, Value};

/// Health check handler.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "slash-tip",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
