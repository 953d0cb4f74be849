//! Organization endpoint integration tests.

mod common;

use chrono::Utc;
use common::TestHarness;
use serde_json::json;

use slash_tip_core::{Tip, TokenAmount};
use slash_tip_store::Store;

#[tokio::test]
async fn create_org_and_read_it_back() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/orgs")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({
            "slug": "acme",
            "name": "Acme Inc",
            "slack_team_id": "T0123",
            "slack_bot_token": "xoxb-secret",
        }))
        .await;
    response.assert_status_ok();

    let response = harness.server.get("/v1/orgs/acme").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["slug"], "acme");
    assert_eq!(body["slack_team_id"], "T0123");
    // The bot token never leaves the service.
    assert!(body.get("slack_bot_token").is_none());
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let response = harness
        .server
        .post("/v1/orgs")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({
            "slug": "acme",
            "name": "Other",
            "slack_team_id": "T9999",
            "slack_bot_token": "xoxb-other",
        }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let harness = TestHarness::new();
    let response = harness.server.get("/v1/orgs/nope").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn action_config_round_trips_with_its_tagged_shape() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let config = json!({
        "type": "send_transaction",
        "contract_address": "0xcustom",
        "function_signature": "reward(address to, uint256 amount)",
        "args": { "to": "{{recipientAddress}}", "amount": "{{amount}}" },
    });
    let response = harness
        .server
        .put("/v1/orgs/acme/action")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&config)
        .await;
    response.assert_status_ok();

    let response = harness.server.get("/v1/orgs/acme").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["action_type"], "send_transaction");
    assert_eq!(body["action_config"]["type"], "send_transaction");
    assert_eq!(body["action_config"]["contract_address"], "0xcustom");
    assert_eq!(
        body["action_config"]["args"]["to"],
        "{{recipientAddress}}"
    );
}

#[tokio::test]
async fn mint_configs_cannot_bypass_the_deploy_flow() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let response = harness
        .server
        .put("/v1/orgs/acme/action")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({ "type": "erc1155_mint" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn tips_and_leaderboard_read_back_ingested_state() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();
    harness.seed_user(&org, "U_A", 3);
    harness.seed_user(&org, "U_B", 3);

    for (hash, to, amount, block) in [
        ("0xaaa", "U_A", 5u64, 100u64),
        ("0xbbb", "U_B", 2, 101),
        ("0xccc", "U_A", 1, 102),
    ] {
        harness
            .store
            .upsert_tip(&Tip {
                tx_hash: hash.into(),
                org_id: org.id,
                from_user_id: "U_B".into(),
                to_user_id: to.into(),
                token_id: 0,
                amount: TokenAmount::from(amount),
                message: None,
                block_number: block,
                block_timestamp: Utc::now(),
                created_at: Utc::now(),
            })
            .unwrap();
    }

    let response = harness.server.get("/v1/orgs/acme/tips?limit=2").await;
    response.assert_status_ok();
    let tips: serde_json::Value = response.json();
    let tips = tips.as_array().unwrap();
    assert_eq!(tips.len(), 2);
    // Newest first, amounts stringified.
    assert_eq!(tips[0]["tx_hash"], "0xccc");
    assert_eq!(tips[0]["amount"], "1");
    assert_eq!(tips[1]["tx_hash"], "0xbbb");

    let response = harness.server.get("/v1/orgs/acme/leaderboard").await;
    let rows: serde_json::Value = response.json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows[0]["user_id"], "U_A");
    assert_eq!(rows[0]["total"], "6");
    assert_eq!(rows[1]["user_id"], "U_B");
    assert_eq!(rows[1]["total"], "2");
}

#[tokio::test]
async fn metadata_upsert_and_fetch() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let response = harness
        .server
        .put("/v1/orgs/acme/metadata/1")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({
            "name": "Acme Star",
            "description": "One gold star",
            "decimals": 0,
        }))
        .await;
    response.assert_status_ok();

    let response = harness.server.get("/v1/orgs/acme/metadata/1").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Acme Star");
    assert_eq!(body["token_id"], 1);

    let response = harness.server.get("/v1/orgs/acme/metadata/2").await;
    response.assert_status_not_found();
}
