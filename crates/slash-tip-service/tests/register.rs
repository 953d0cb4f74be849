//! User registration integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slash_tip_store::Store;

fn register_body(user_id: &str, address: &str) -> serde_json::Value {
    json!({
        "team_id": "T0123",
        "user_id": user_id,
        "nickname": "casey",
        "address": address,
    })
}

#[tokio::test]
async fn register_creates_user_with_the_daily_allowance() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();

    let response = harness
        .server
        .post("/v1/register")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&register_body("U_NEW", "0x2222222222222222222222222222222222222222"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "U_NEW");
    assert_eq!(body["allowance"], org.daily_allowance);

    let user = harness.store.get_user(&org.id, "U_NEW").unwrap().unwrap();
    assert_eq!(user.address, "0x2222222222222222222222222222222222222222");
}

#[tokio::test]
async fn reregistering_updates_the_address_but_keeps_the_allowance() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();
    harness.seed_user(&org, "U_NEW", 1);

    let response = harness
        .server
        .post("/v1/register")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&register_body("U_NEW", "0x3333333333333333333333333333333333333333"))
        .await;

    response.assert_status_ok();
    let user = harness.store.get_user(&org.id, "U_NEW").unwrap().unwrap();
    assert_eq!(user.address, "0x3333333333333333333333333333333333333333");
    // No mid-day refill.
    assert_eq!(user.allowance, 1);
}

#[tokio::test]
async fn register_submits_on_chain_when_contracts_exist() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transact/sendTransaction"))
        .and(body_partial_json(json!({
            "contractAddress": "0x00000000000000000000000000000000000000bb",
            "args": {
                "id": "U_NEW",
                "user": {
                    "nickname": "casey",
                    "account": "0x2222222222222222222222222222222222222222",
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "transactionId": "tx-reg" })),
        )
        .expect(1)
        .mount(&relay)
        .await;
    Mock::given(method("GET"))
        .and(path("/wallet/project/proj-1/request/tx-reg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactionAttempts": [{ "hash": "0xreg", "status": "SUBMITTED" }]
        })))
        .mount(&relay)
        .await;

    let harness = TestHarness::with_relay(&relay.uri());
    let org = harness.seed_bare_org();
    harness.seed_contracts(&org);

    let response = harness
        .server
        .post("/v1/register")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&register_body("U_NEW", "0x2222222222222222222222222222222222222222"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["tx_hash"], "0xreg");
}

#[tokio::test]
async fn register_rejects_an_empty_address() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let response = harness
        .server
        .post("/v1/register")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&register_body("U_NEW", ""))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn unregister_removes_the_user() {
    let harness = TestHarness::new();
    let org = harness.seed_bare_org();
    harness.seed_user(&org, "U_GONE", 3);

    let response = harness
        .server
        .post("/v1/unregister")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({ "team_id": "T0123", "user_id": "U_GONE" }))
        .await;

    response.assert_status_ok();
    assert!(harness.store.get_user(&org.id, "U_GONE").unwrap().is_none());
}
