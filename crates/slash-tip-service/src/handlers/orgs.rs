//! Organization endpoints: install-time creation and dashboard reads.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slash_tip_core::{ActionConfig, ActionType, Organization};
use slash_tip_store::{LeaderboardEntry, Store};

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of an organization. The bot token never leaves the service.
#[derive(Debug, Serialize)]
pub struct OrgView {
    /// Organization id.
    pub id: String,

    /// URL-safe slug.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Slack team id.
    pub slack_team_id: String,

    /// Tips each user may give per day.
    pub daily_allowance: i64,

    /// Configured action type, if setup finished.
    pub action_type: Option<ActionType>,

    /// Action config blob.
    pub action_config: Option<ActionConfig>,

    /// When the org was created.
    pub created_at: DateTime<Utc>,
}

impl From<Organization> for OrgView {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id.to_string(),
            slug: org.slug,
            name: org.name,
            slack_team_id: org.slack_team_id,
            daily_allowance: org.daily_allowance,
            action_type: org.action_type,
            action_config: org.action_config,
            created_at: org.created_at,
        }
    }
}

/// Body for org creation (the Slack install flow).
#[derive(Debug, Deserialize)]
pub struct CreateOrgRequest {
    /// URL-safe unique slug.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Slack team id.
    pub slack_team_id: String,

    /// Slack bot token for the workspace.
    pub slack_bot_token: String,

    /// Daily allowance override.
    #[serde(default)]
    pub daily_allowance: Option<i64>,
}

/// Create an organization at install time.
pub async fn create_org(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Json(request): Json<CreateOrgRequest>,
) -> Result<Json<OrgView>, ApiError> {
    if request.slug.is_empty() {
        return Err(ApiError::BadRequest("slug is required".into()));
    }
    if state.store.get_org_by_slug(&request.slug)?.is_some() {
        return Err(ApiError::BadRequest(format!(
            "slug already taken: {}",
            request.slug
        )));
    }
    if state
        .store
        .get_org_by_team_id(&request.slack_team_id)?
        .is_some()
    {
        return Err(ApiError::BadRequest(format!(
            "team already installed: {}",
            request.slack_team_id
        )));
    }

    let mut org = Organization::new(
        &request.slug,
        &request.name,
        &request.slack_team_id,
        &request.slack_bot_token,
    );
    if let Some(allowance) = request.daily_allowance {
        if allowance <= 0 {
            return Err(ApiError::BadRequest(
                "daily_allowance must be positive".into(),
            ));
        }
        org.daily_allowance = allowance;
    }
    state.store.put_org(&org)?;

    tracing::info!(org = %org.id, slug = %org.slug, "organization created");
    Ok(Json(org.into()))
}

/// Fetch an organization by slug.
pub async fn get_org(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<OrgView>, ApiError> {
    let org = require_org(&state, &slug)?;
    Ok(Json(org.into()))
}

/// Registered user view (the wallet address is public on-chain anyway).
#[derive(Debug, Serialize)]
pub struct UserView {
    /// Slack user id.
    pub id: String,

    /// Display nickname.
    pub nickname: String,

    /// Wallet address.
    pub address: String,

    /// Remaining daily allowance.
    pub allowance: i64,
}

/// List an org's registered users.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let org = require_org(&state, &slug)?;
    let users = state
        .store
        .list_users_by_org(&org.id)?
        .into_iter()
        .map(|user| UserView {
            id: user.id,
            nickname: user.nickname,
            address: user.address,
            allowance: user.allowance,
        })
        .collect();
    Ok(Json(users))
}

/// Query parameters for the tip listing.
#[derive(Debug, Deserialize)]
pub struct TipListQuery {
    /// Maximum rows to return.
    #[serde(default = "default_tip_limit")]
    pub limit: usize,
}

const fn default_tip_limit() -> usize {
    50
}

/// One tip in the listing; amounts are decimal strings.
#[derive(Debug, Serialize)]
pub struct TipView {
    /// Transaction hash.
    pub tx_hash: String,

    /// Sender's user id.
    pub from_user_id: String,

    /// Recipient's user id.
    pub to_user_id: String,

    /// Token id.
    pub token_id: u64,

    /// Amount in base units, stringified.
    pub amount: String,

    /// Message attached to the tip.
    pub message: Option<String>,

    /// Block the tip was mined in.
    pub block_number: u64,

    /// Timestamp of that block.
    pub block_timestamp: DateTime<Utc>,
}

/// List an org's tips, newest first.
pub async fn list_tips(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<TipListQuery>,
) -> Result<Json<Vec<TipView>>, ApiError> {
    let org = require_org(&state, &slug)?;
    let tips = state
        .store
        .list_tips_by_org(&org.id, query.limit)?
        .into_iter()
        .map(|tip| TipView {
            tx_hash: tip.tx_hash,
            from_user_id: tip.from_user_id,
            to_user_id: tip.to_user_id,
            token_id: tip.token_id,
            amount: tip.amount.to_string(),
            message: tip.message,
            block_number: tip.block_number,
            block_timestamp: tip.block_timestamp,
        })
        .collect();
    Ok(Json(tips))
}

/// One leaderboard row.
#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    /// User id.
    pub user_id: String,

    /// Display nickname.
    pub nickname: String,

    /// Total received in base units, stringified.
    pub total: String,
}

/// Ranked total received per registered user.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let org = require_org(&state, &slug)?;
    let rows = state
        .store
        .leaderboard(&org.id)?
        .into_iter()
        .map(|entry: LeaderboardEntry| LeaderboardRow {
            user_id: entry.user_id,
            nickname: entry.nickname,
            total: entry.total.to_string(),
        })
        .collect();
    Ok(Json(rows))
}

pub(crate) fn require_org(state: &AppState, slug: &str) -> Result<Organization, ApiError> {
    state
        .store
        .get_org_by_slug(slug)?
        .ok_or_else(|| ApiError::NotFound(format!("organization: {slug}")))
}
