//! Indexer webhook integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

use slash_tip_store::Store;

fn tipped_event(tx_hash: &str, amount: &str) -> serde_json::Value {
    json!({
        "type": "Tipped",
        "contract": "0x00000000000000000000000000000000000000AA",
        "txHash": tx_hash,
        "fromUserId": "U_B",
        "toUserId": "U_A",
        "tokenId": 0,
        "amount": amount,
        "message": "thanks",
        "blockNumber": 100,
        "blockTimestamp": "2026-08-23T00:00:00Z",
    })
}

async fn deliver(harness: &TestHarness, body: &serde_json::Value) -> serde_json::Value {
    let raw = serde_json::to_string(body).unwrap();
    let signature = harness.sign_webhook(&raw);
    let response = harness
        .server
        .post("/webhooks/indexer")
        .add_header("x-indexer-signature", signature.as_str())
        .text(raw)
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn org_deployed_is_retrievable_by_id_and_address() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();

    let body = json!({ "events": [{
        "type": "OrgDeployed",
        "orgId": org.id.to_string(),
        "slashTip": "0x00000000000000000000000000000000000000AA",
        "userRegistry": "0x00000000000000000000000000000000000000BB",
        "tipAction": "0x00000000000000000000000000000000000000CC",
        "tipToken": null,
    }]});
    let result = deliver(&harness, &body).await;
    assert_eq!(result["received"], true);
    assert_eq!(result["applied"], 1);

    let by_id = harness.store.get_org_contracts(&org.id).unwrap().unwrap();
    assert_eq!(
        by_id.slash_tip_address,
        "0x00000000000000000000000000000000000000AA"
    );
    // Reverse lookup is case-insensitive.
    let by_address = harness
        .store
        .find_org_contracts_by_address("0x00000000000000000000000000000000000000aa")
        .unwrap()
        .unwrap();
    assert_eq!(by_address.org_id, org.id);
}

#[tokio::test]
async fn replayed_tipped_event_does_not_double_count() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();
    harness.seed_user(&org, "U_A", 3);
    harness.seed_user(&org, "U_B", 3);
    harness.seed_contracts(&org);

    let body = json!({ "events": [tipped_event("0xT1", "5"), tipped_event("0xT1", "5")] });
    let result = deliver(&harness, &body).await;
    assert_eq!(result["applied"], 2);

    // Second delivery of the whole batch.
    deliver(&harness, &body).await;

    let tips = harness.store.list_tips_by_org(&org.id, 10).unwrap();
    assert_eq!(tips.len(), 1);

    let rows = harness.store.leaderboard(&org.id).unwrap();
    assert_eq!(rows[0].user_id, "U_A");
    assert_eq!(rows[0].total.to_string(), "5");
}

#[tokio::test]
async fn events_for_unknown_contracts_are_skipped_not_failed() {
    let harness = TestHarness::new();

    let body = json!({ "events": [tipped_event("0xT9", "1")] });
    let result = deliver(&harness, &body).await;
    assert_eq!(result["received"], true);
    assert_eq!(result["applied"], 0);
    assert_eq!(result["skipped"], 1);
}

#[tokio::test]
async fn user_added_registers_the_user_via_reverse_lookup() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();
    harness.seed_contracts(&org);

    let body = json!({ "events": [{
        "type": "UserAdded",
        "contract": "0x00000000000000000000000000000000000000BB",
        "userId": "U_CHAIN",
        "nickname": "chainy",
        "address": "0x4444444444444444444444444444444444444444",
        "allowance": 7,
    }]});
    let result = deliver(&harness, &body).await;
    assert_eq!(result["applied"], 1);

    let user = harness.store.get_user(&org.id, "U_CHAIN").unwrap().unwrap();
    assert_eq!(user.allowance, 7);
}

#[tokio::test]
async fn bad_signature_is_unauthorized() {
    let harness = TestHarness::new();
    let body = json!({ "events": [] }).to_string();

    let response = harness
        .server
        .post("/webhooks/indexer")
        .add_header("x-indexer-signature", "deadbeef")
        .text(body)
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn missing_signature_is_a_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/webhooks/indexer")
        .text(json!({ "events": [] }).to_string())
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn unsigned_delivery_is_accepted_when_no_secret_is_configured() {
    let harness = TestHarness::with_config(|config| {
        config.indexer_webhook_secret = None;
    });

    let response = harness
        .server
        .post("/webhooks/indexer")
        .text(json!({ "events": [] }).to_string())
        .await;
    response.assert_status_ok();
}
