//! Tip dispatch integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slash_tip_store::Store;

/// Mount a relay that accepts one transaction and reports a hash.
async fn mount_relay(server: &MockServer, expected_args: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/transact/sendTransaction"))
        .and(header("authorization", "Bearer test-relay-key"))
        .and(body_partial_json(json!({ "args": expected_args })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "transactionId": "tx-123" })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wallet/project/proj-1/request/tx-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactionAttempts": [{ "hash": "0xhash1", "status": "SUBMITTED" }]
        })))
        .mount(server)
        .await;
}

fn tip_body(amount: i64, message: Option<&str>) -> serde_json::Value {
    json!({
        "team_id": "T0123",
        "from_user_id": "U_FROM",
        "to_user_id": "U_TO",
        "amount": amount,
        "message": message,
    })
}

#[tokio::test]
async fn erc1155_tip_submits_unscaled_amount_and_broadcasts() {
    let relay = MockServer::start().await;
    mount_relay(
        &relay,
        json!({ "_fromId": "U_FROM", "_toId": "U_TO", "_amount": "2" }),
    )
    .await;

    let harness = TestHarness::with_relay(&relay.uri());
    let org = harness.seed_erc1155_org();
    harness.seed_user(&org, "U_FROM", 3);
    harness.seed_user(&org, "U_TO", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(2, Some("great work")))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["tx_hash"], "0xhash1");
    assert_eq!(body["response"]["kind"], "in_channel");
    let text = body["response"]["blocks"][0]["text"].as_str().unwrap();
    assert!(text.contains("+2 (great work)"), "{text}");
    assert!(text.contains("<@U_FROM> ->-> <@U_TO>"), "{text}");

    // Allowance is deducted off-chain.
    let sender = harness.store.get_user(&org.id, "U_FROM").unwrap().unwrap();
    assert_eq!(sender.allowance, 1);
}

#[tokio::test]
async fn erc20_tip_scales_amount_by_decimals_on_the_wire() {
    let relay = MockServer::start().await;
    mount_relay(&relay, json!({ "_amount": "2000000" })).await;

    let harness = TestHarness::with_relay(&relay.uri());
    let org = harness.seed_erc20_org(6);
    harness.seed_user(&org, "U_FROM", 3);
    harness.seed_user(&org, "U_TO", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(2, None))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true, "{body}");
}

#[tokio::test]
async fn allowance_is_enforced_across_tips() {
    let relay = MockServer::start().await;
    mount_relay(&relay, json!({})).await;

    let harness = TestHarness::with_relay(&relay.uri());
    let org = harness.seed_erc1155_org();
    harness.seed_user(&org, "U_FROM", 3);
    harness.seed_user(&org, "U_TO", 3);

    // First tip of 2 succeeds, leaving 1.
    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(2, None))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    // Second tip of 2 is rejected citing the remaining 1.
    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(2, None))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["response"]["kind"], "ephemeral");
    let text = body["response"]["text"].as_str().unwrap();
    assert!(text.contains("you only have 1 more tips left"), "{text}");
}

#[tokio::test]
async fn zero_and_negative_amounts_are_rejected_without_executing() {
    let harness = TestHarness::new();
    let org = harness.seed_erc1155_org();
    harness.seed_user(&org, "U_FROM", 3);
    harness.seed_user(&org, "U_TO", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(0, None))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["response"]["text"], "You can't tip 0, sorry!");

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(-5, None))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["response"]["text"],
        "Nice try, but you can't steal tips!"
    );

    // Neither attempt touched the allowance.
    let sender = harness.store.get_user(&org.id, "U_FROM").unwrap().unwrap();
    assert_eq!(sender.allowance, 3);
}

#[tokio::test]
async fn unregistered_recipient_is_rejected_with_instructions() {
    let harness = TestHarness::new();
    let org = harness.seed_erc1155_org();
    harness.seed_user(&org, "U_FROM", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(1, None))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["response"]["text"],
        "<@U_TO> is not registered. They need to run '/register <address>' first."
    );
}

#[tokio::test]
async fn unconfigured_org_gets_a_private_setup_notice() {
    let harness = TestHarness::new();
    harness.seed_bare_org();

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(1, None))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["response"]["kind"], "ephemeral");
}

#[tokio::test]
async fn unknown_team_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(1, None))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn tip_requires_the_service_key() {
    let harness = TestHarness::new();
    harness.seed_erc1155_org();

    let response = harness.server.post("/v1/tip").json(&tip_body(1, None)).await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", "wrong-key")
        .json(&tip_body(1, None))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn poem_action_broadcasts_verse_without_a_relay() {
    let harness = TestHarness::new();
    harness.seed_org_with_action(
        slash_tip_core::ActionType::Poem,
        slash_tip_core::ActionConfig::Poem(slash_tip_core::PoemConfig::default()),
    );

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(1, Some("for the code review")))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["response"]["blocks"][0]["text"],
        "<@U_FROM> wrote a poem for <@U_TO>:"
    );
    let verse = body["response"]["blocks"][1]["text"].as_str().unwrap();
    assert!(verse.starts_with('_') && verse.ends_with('_'), "{verse}");
}

#[tokio::test]
async fn self_tip_appends_a_poem_block_when_generation_is_available() {
    let relay = MockServer::start().await;
    mount_relay(&relay, json!({})).await;

    let textgen = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "self five" } }]
        })))
        .mount(&textgen)
        .await;

    let relay_url = relay.uri();
    let textgen_url = textgen.uri();
    let harness = TestHarness::with_config(move |config| {
        config.relay_api_url = Some(relay_url.clone());
        config.relay_api_key = Some("test-relay-key".into());
        config.relay_project_id = "proj-1".into();
        config.textgen_api_url = Some(textgen_url.clone());
        config.textgen_api_key = Some("test-textgen-key".into());
    });
    let org = harness.seed_erc1155_org();
    harness.seed_user(&org, "U_FROM", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&json!({
            "team_id": "T0123",
            "from_user_id": "U_FROM",
            "to_user_id": "U_FROM",
            "amount": 1,
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true, "{body}");
    let blocks = body["response"]["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2, "{body}");
    assert_eq!(blocks[1]["text"], "self five");
}

#[tokio::test]
async fn send_transaction_action_interpolates_the_template() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transact/sendTransaction"))
        .and(body_partial_json(json!({
            "chainId": 10,
            "contractAddress": "0xcustom",
            "functionSignature": "reward(address to, uint256 amount)",
            "args": { "to": "0x1111111111111111111111111111111111111111", "amount": 4 }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "transactionId": "tx-123" })),
        )
        .mount(&relay)
        .await;
    Mock::given(method("GET"))
        .and(path("/wallet/project/proj-1/request/tx-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactionAttempts": [{ "hash": "0xhash1", "status": "SUBMITTED" }]
        })))
        .mount(&relay)
        .await;

    let harness = TestHarness::with_relay(&relay.uri());
    let org = harness.seed_org_with_action(
        slash_tip_core::ActionType::SendTransaction,
        serde_json::from_value(json!({
            "type": "send_transaction",
            "contract_address": "0xcustom",
            "function_signature": "reward(address to, uint256 amount)",
            "args": { "to": "{{recipientAddress}}", "amount": "{{amount}}" },
            "chain_id": 10,
            "success_message": "Reward sent!"
        }))
        .unwrap(),
    );
    harness.seed_user(&org, "U_TO", 3);

    let response = harness
        .server
        .post("/v1/tip")
        .add_header("x-api-key", harness.service_api_key.as_str())
        .json(&tip_body(4, None))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true, "{body}");
    assert_eq!(body["response"]["blocks"][0]["text"], "Reward sent!");
}
