//! Scheduled-job endpoints, invoked by an external cron runner.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use slash_tip_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Result of an allowance grant run.
#[derive(Debug, Serialize)]
pub struct AllowanceGrantResponse {
    /// Orgs granted this run.
    pub granted: usize,

    /// Orgs skipped (already granted today, or no action configured).
    pub skipped: usize,
}

/// Grant the daily allowance to every configured org, at most once per date.
///
/// Re-invocations on the same date are no-ops, so an over-eager cron runner
/// cannot double-grant.
pub async fn grant_allowance(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
) -> Result<Json<AllowanceGrantResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let mut granted = 0;
    let mut skipped = 0;

    for org in state.store.list_orgs()? {
        if org.action_type.is_none() {
            skipped += 1;
            continue;
        }
        if state
            .store
            .grant_daily_allowance(&org.id, org.daily_allowance, today)?
        {
            granted += 1;
        } else {
            skipped += 1;
        }
    }

    tracing::info!(
        caller = %auth.service_name,
        granted,
        skipped,
        %today,
        "daily allowance grant run"
    );
    Ok(Json(AllowanceGrantResponse { granted, skipped }))
}
