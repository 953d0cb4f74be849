//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{cron, deploy, health, indexer, metadata, orgs, register, tips};
use crate::state::AppState;

/// Tip dispatches block on the relay; cap them so a relay stall cannot
/// exhaust the server.
const TIP_CONCURRENCY: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Slack bot (service API key auth)
/// - `POST /v1/tip` - Dispatch a tip through the org's configured action
/// - `POST /v1/register` - Register a user's wallet
/// - `POST /v1/unregister` - Remove a user
///
/// ## Orgs
/// - `POST /v1/orgs` - Create an org (install flow, service auth)
/// - `GET /v1/orgs/:slug` - Org details
/// - `GET /v1/orgs/:slug/users` - Registered users
/// - `GET /v1/orgs/:slug/tips` - Recent tips
/// - `GET /v1/orgs/:slug/leaderboard` - Totals received
/// - `PUT /v1/orgs/:slug/action` - Configure a non-deploying action (service auth)
/// - `POST /v1/orgs/:slug/deploy` - Kick off contract deployment (service auth)
/// - `GET/PUT /v1/orgs/:slug/metadata/:token_id` - Token display metadata
///
/// ## Cron (service API key auth)
/// - `POST /v1/cron/allowance` - Daily allowance grant
///
/// ## Webhooks (signature verification)
/// - `POST /webhooks/indexer` - Chain event ingestion
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health_check))
        // Slack bot
        .route(
            "/v1/tip",
            post(tips::dispatch_tip).layer(ConcurrencyLimitLayer::new(TIP_CONCURRENCY)),
        )
        .route("/v1/register", post(register::register_user))
        .route("/v1/unregister", post(register::unregister_user))
        // Orgs
        .route("/v1/orgs", post(orgs::create_org))
        .route("/v1/orgs/:slug", get(orgs::get_org))
        .route("/v1/orgs/:slug/users", get(orgs::list_users))
        .route("/v1/orgs/:slug/tips", get(orgs::list_tips))
        .route("/v1/orgs/:slug/leaderboard", get(orgs::leaderboard))
        .route("/v1/orgs/:slug/action", put(deploy::configure_action))
        .route("/v1/orgs/:slug/deploy", post(deploy::deploy))
        .route(
            "/v1/orgs/:slug/metadata/:token_id",
            get(metadata::get_metadata).put(metadata::put_metadata),
        )
        // Cron
        .route("/v1/cron/allowance", post(cron::grant_allowance))
        // Webhooks
        .route("/webhooks/indexer", post(indexer::handle_indexer_webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
