//! Common test utilities for slash-tip integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use slash_tip_core::{
    ActionConfig, ActionType, DeploymentStatus, MintConfig, OrgContracts, Organization, User,
};
use slash_tip_service::{create_router, AppState, ServiceConfig};
use slash_tip_store::{RocksStore, Store};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store handle for seeding and asserting on state.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The service API key for service-to-service requests.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and no relay.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness pointing the relay at a mock server.
    pub fn with_relay(relay_url: &str) -> Self {
        let relay_url = relay_url.to_string();
        Self::with_config(move |config| {
            config.relay_api_url = Some(relay_url.clone());
            config.relay_api_key = Some("test-relay-key".into());
            config.relay_project_id = "proj-1".into();
            config.factory_address = Some("0xfactory".into());
            config.admin_address = Some("0xadmin".into());
            config.operator_addresses = vec!["0xoperator".into()];
        })
    }

    /// Create a harness with arbitrary config overrides.
    pub fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let service_api_key = "test-service-key".to_string();

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            service_api_key: Some(service_api_key.clone()),
            indexer_webhook_secret: Some("test-webhook-secret".into()),
            ..ServiceConfig::default()
        };
        adjust(&mut config);

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            service_api_key,
        }
    }

    /// Seed an org with a deployed ERC1155 action config.
    pub fn seed_erc1155_org(&self) -> Organization {
        self.seed_org_with_action(
            ActionType::Erc1155Mint,
            ActionConfig::Erc1155Mint(MintConfig {
                slash_tip_address: Some("0x00000000000000000000000000000000000000aa".into()),
                user_registry_address: Some("0x00000000000000000000000000000000000000bb".into()),
                deployment_status: DeploymentStatus::Deployed,
                ..MintConfig::default()
            }),
        )
    }

    /// Seed an org with a deployed ERC20 action config using the given decimals.
    pub fn seed_erc20_org(&self, decimals: u32) -> Organization {
        self.seed_org_with_action(
            ActionType::Erc20Mint,
            ActionConfig::Erc20Mint(MintConfig {
                slash_tip_address: Some("0x00000000000000000000000000000000000000aa".into()),
                user_registry_address: Some("0x00000000000000000000000000000000000000bb".into()),
                decimals: Some(decimals),
                deployment_status: DeploymentStatus::Deployed,
                ..MintConfig::default()
            }),
        )
    }

    /// Seed an org with the given action.
    pub fn seed_org_with_action(
        &self,
        action_type: ActionType,
        config: ActionConfig,
    ) -> Organization {
        let mut org = Organization::new("acme", "Acme Inc", "T0123", "xoxb-test");
        org.set_action(action_type, Some(config))
            .expect("config shape matches");
        self.store.put_org(&org).expect("Failed to seed org");
        org
    }

    /// Seed an org with no action configured.
    pub fn seed_bare_org(&self) -> Organization {
        let org = Organization::new("acme", "Acme Inc", "T0123", "xoxb-test");
        self.store.put_org(&org).expect("Failed to seed org");
        org
    }

    /// Seed a registered user with the given allowance.
    pub fn seed_user(&self, org: &Organization, id: &str, allowance: i64) -> User {
        let user = User::new(org.id, id, id, "0x1111111111111111111111111111111111111111", allowance);
        self.store.upsert_user(&user).expect("Failed to seed user");
        user
    }

    /// Seed the org's deployed contract mapping.
    pub fn seed_contracts(&self, org: &Organization) -> OrgContracts {
        let contracts = OrgContracts {
            org_id: org.id,
            slash_tip_address: "0x00000000000000000000000000000000000000aa".into(),
            user_registry_address: "0x00000000000000000000000000000000000000bb".into(),
            tip_action_address: "0x00000000000000000000000000000000000000cc".into(),
            tip_token_address: None,
            deployed_at: chrono::Utc::now(),
        };
        self.store
            .upsert_org_contracts(&contracts)
            .expect("Failed to seed contracts");
        contracts
    }

    /// Sign a webhook body the way the indexer does.
    pub fn sign_webhook(&self, body: &str) -> String {
        slash_tip_service::crypto::hmac_sha256_hex("test-webhook-secret", body)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
