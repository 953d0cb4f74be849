//! Chain operations built on the transaction relay.
//!
//! The [`Chain`] facade owns the relay client and knows the function
//! signatures of the deployed contracts. Submissions return as soon as the
//! relay accepts; the hash poll afterwards is best-effort and a missing hash
//! is never a failure, since the ingestion pipeline reconciles final state
//! from events.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use slash_tip_core::{DeploymentStatus, OrgContracts, OrgId, Organization, TokenAmount};
use slash_tip_relay::{RelayClient, RelayError, TransactionRequest};
use slash_tip_store::{RocksStore, Store, StoreError};

/// Hash poll budget for tip mints.
const MINT_HASH_ATTEMPTS: u32 = 5;

/// Hash poll budget for user registration.
const REGISTER_HASH_ATTEMPTS: u32 = 3;

/// Hash poll budget for factory deployments (deployments are slow).
const DEPLOY_HASH_ATTEMPTS: u32 = 60;

/// Poll interval for tip and registration hashes.
const HASH_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Poll interval for deployment hashes.
const DEPLOY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Attempts to find the ingested contract mapping after a deployment.
const CONTRACTS_POLL_ATTEMPTS: u32 = 5;

/// Interval between contract mapping polls.
const CONTRACTS_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors from chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The relay rejected or failed the request.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A required address is not configured.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}

/// Typed chain operations for handlers and actions.
pub struct Chain {
    relay: RelayClient,
    store: Arc<RocksStore>,
    chain_id: u64,
    project_id: String,
    factory_address: Option<String>,
    admin_address: Option<String>,
    operator_addresses: Vec<String>,
}

impl Chain {
    /// Create the chain facade.
    #[must_use]
    pub fn new(
        relay: RelayClient,
        store: Arc<RocksStore>,
        chain_id: u64,
        project_id: String,
        factory_address: Option<String>,
        admin_address: Option<String>,
        operator_addresses: Vec<String>,
    ) -> Self {
        Self {
            relay,
            store,
            chain_id,
            project_id,
            factory_address,
            admin_address,
            operator_addresses,
        }
    }

    /// Submit a tip mint to the org's slash-tip contract.
    ///
    /// Returns the transaction hash if it became available within the poll
    /// budget; `None` means submitted but not yet broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay rejects the submission.
    pub async fn mint(
        &self,
        slash_tip_address: &str,
        from: &str,
        to: &str,
        amount: TokenAmount,
        message: Option<&str>,
    ) -> Result<Option<String>, ChainError> {
        let mut args = Map::new();
        args.insert("_fromId".into(), Value::from(from));
        args.insert("_toId".into(), Value::from(to));
        args.insert("_amount".into(), Value::from(amount.to_string()));
        args.insert("_data".into(), Value::from(message.unwrap_or("")));

        let request = TransactionRequest {
            chain_id: self.chain_id,
            project_id: self.project_id.clone(),
            contract_address: slash_tip_address.to_string(),
            function_signature:
                "tip(string _fromId, string _toId, uint256 _amount, string _data)".into(),
            args,
        };

        let transaction_id = self.relay.send_transaction(&request).await?;
        Ok(self
            .poll_hash(&transaction_id, MINT_HASH_ATTEMPTS, HASH_POLL_INTERVAL)
            .await)
    }

    /// Register a user on the org's user-registry contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay rejects the submission.
    pub async fn register_user(
        &self,
        user_registry_address: &str,
        user_id: &str,
        nickname: &str,
        address: &str,
        allowance: i64,
    ) -> Result<Option<String>, ChainError> {
        let mut user = Map::new();
        user.insert("nickname".into(), Value::from(nickname));
        user.insert("account".into(), Value::from(address));
        user.insert("allowance".into(), Value::from(allowance));

        let mut args = Map::new();
        args.insert("id".into(), Value::from(user_id));
        args.insert("user".into(), Value::Object(user));

        let request = TransactionRequest {
            chain_id: self.chain_id,
            project_id: self.project_id.clone(),
            contract_address: user_registry_address.to_string(),
            function_signature:
                "addUser(string id, (string nickname, address account, uint256 allowance) user)"
                    .into(),
            args,
        };

        let transaction_id = self.relay.send_transaction(&request).await?;
        Ok(self
            .poll_hash(&transaction_id, REGISTER_HASH_ATTEMPTS, HASH_POLL_INTERVAL)
            .await)
    }

    /// Whether a user is registered in the org. Advisory: any lookup failure
    /// reads as not registered.
    #[must_use]
    pub fn user_exists(&self, org_id: &OrgId, user_id: &str) -> bool {
        matches!(self.store.get_user(org_id, user_id), Ok(Some(_)))
    }

    /// The user's remaining daily allowance, if registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn remaining_allowance(
        &self,
        org_id: &OrgId,
        user_id: &str,
    ) -> Result<Option<i64>, ChainError> {
        Ok(self
            .store
            .get_user(org_id, user_id)?
            .map(|user| user.allowance))
    }

    /// Deploy an ERC1155 tip setup for the org via the factory.
    ///
    /// Returns once the relay accepts; a detached task reconciles the org's
    /// config once the `OrgDeployed` event lands.
    ///
    /// # Errors
    ///
    /// Returns an error if the factory is unconfigured or the relay rejects
    /// the submission.
    pub async fn deploy_erc1155(
        &self,
        org: &Organization,
        token_id: u64,
        base_uri: &str,
        contract_uri: &str,
    ) -> Result<(), ChainError> {
        let mut args = self.factory_args(org)?;
        args.insert("_tokenBaseURI".into(), Value::from(base_uri));
        args.insert("_contractURI".into(), Value::from(contract_uri));
        args.insert("_tokenId".into(), Value::from(token_id));

        self.deploy(
            org,
            "deployWithERC1155(string _orgId, address _admin, address[] _operators, string _tokenBaseURI, string _contractURI, uint256 _tokenId)",
            args,
        )
        .await
    }

    /// Deploy an ERC20 tip setup for the org via the factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the factory is unconfigured or the relay rejects
    /// the submission.
    pub async fn deploy_erc20(
        &self,
        org: &Organization,
        token_name: &str,
        token_symbol: &str,
        decimals: u32,
    ) -> Result<(), ChainError> {
        let mut args = self.factory_args(org)?;
        args.insert("_tokenName".into(), Value::from(token_name));
        args.insert("_tokenSymbol".into(), Value::from(token_symbol));
        args.insert("_tokenDecimals".into(), Value::from(decimals));

        self.deploy(
            org,
            "deployWithERC20(string _orgId, address _admin, address[] _operators, string _tokenName, string _tokenSymbol, uint8 _tokenDecimals)",
            args,
        )
        .await
    }

    /// Deploy an ERC20 vault tip setup (tips paid out of a pre-funded vault).
    ///
    /// # Errors
    ///
    /// Returns an error if the factory is unconfigured or the relay rejects
    /// the submission.
    pub async fn deploy_erc20_vault(
        &self,
        org: &Organization,
        token_address: &str,
        vault_manager_address: &str,
    ) -> Result<(), ChainError> {
        let mut args = self.factory_args(org)?;
        args.insert("_vaultManager".into(), Value::from(vault_manager_address));
        args.insert("_token".into(), Value::from(token_address));

        self.deploy(
            org,
            "deployWithERC20Vault(string _orgId, address _admin, address[] _operators, address _vaultManager, address _token)",
            args,
        )
        .await
    }

    /// Common factory args: org id, admin, operators.
    fn factory_args(&self, org: &Organization) -> Result<Map<String, Value>, ChainError> {
        let admin = self
            .admin_address
            .as_ref()
            .ok_or(ChainError::NotConfigured("ADMIN_ADDRESS"))?;

        let mut args = Map::new();
        args.insert("_orgId".into(), Value::from(org.id.to_string()));
        args.insert("_admin".into(), Value::from(admin.as_str()));
        args.insert(
            "_operators".into(),
            Value::Array(
                self.operator_addresses
                    .iter()
                    .map(|a| Value::from(a.as_str()))
                    .collect(),
            ),
        );
        Ok(args)
    }

    /// Submit a factory call and spawn reconciliation.
    async fn deploy(
        &self,
        org: &Organization,
        function_signature: &str,
        args: Map<String, Value>,
    ) -> Result<(), ChainError> {
        let factory = self
            .factory_address
            .as_ref()
            .ok_or(ChainError::NotConfigured("FACTORY_ADDRESS"))?;

        let request = TransactionRequest {
            chain_id: self.chain_id,
            project_id: self.project_id.clone(),
            contract_address: factory.clone(),
            function_signature: function_signature.into(),
            args,
        };

        let transaction_id = self.relay.send_transaction(&request).await?;
        tracing::info!(org = %org.id, %transaction_id, "deployment submitted");

        let relay = self.relay.clone();
        let store = Arc::clone(&self.store);
        let project_id = self.project_id.clone();
        let org_id = org.id;
        tokio::spawn(async move {
            reconcile_deployment(&relay, &store, &project_id, org_id, &transaction_id).await;
        });

        Ok(())
    }

    /// Poll for a hash, swallowing poll failures. The submission already
    /// succeeded; a missing hash only degrades the Slack message.
    async fn poll_hash(
        &self,
        transaction_id: &str,
        attempts: u32,
        interval: Duration,
    ) -> Option<String> {
        match self
            .relay
            .wait_for_hash(&self.project_id, transaction_id, attempts, interval)
            .await
        {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(%transaction_id, error = %e, "hash poll failed");
                None
            }
        }
    }
}

/// Wait for the deployment hash, then for the ingested contract mapping,
/// and mark the org's action config deployed. Runs detached.
async fn reconcile_deployment(
    relay: &RelayClient,
    store: &RocksStore,
    project_id: &str,
    org_id: OrgId,
    transaction_id: &str,
) {
    let hash = relay
        .wait_for_hash(
            project_id,
            transaction_id,
            DEPLOY_HASH_ATTEMPTS,
            DEPLOY_POLL_INTERVAL,
        )
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%transaction_id, error = %e, "deployment hash poll failed");
            None
        });
    tracing::info!(org = %org_id, hash = ?hash, "deployment transaction broadcast");

    for _ in 0..CONTRACTS_POLL_ATTEMPTS {
        tokio::time::sleep(CONTRACTS_POLL_INTERVAL).await;

        match store.get_org_contracts(&org_id) {
            Ok(Some(contracts)) => {
                if let Err(e) = mark_deployed(store, &org_id, &contracts) {
                    tracing::error!(org = %org_id, error = %e, "failed to mark org deployed");
                }
                return;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(org = %org_id, error = %e, "contract mapping poll failed");
                return;
            }
        }
    }

    tracing::warn!(org = %org_id, "deployment not ingested in time, leaving status pending");
}

fn mark_deployed(
    store: &RocksStore,
    org_id: &OrgId,
    contracts: &OrgContracts,
) -> Result<(), ChainError> {
    let Some(mut org) = store.get_org(org_id)? else {
        return Ok(());
    };

    if let Some(mint) = org.action_config.as_mut().and_then(|c| c.as_mint_mut()) {
        mint.slash_tip_address = Some(contracts.slash_tip_address.clone());
        mint.user_registry_address = Some(contracts.user_registry_address.clone());
        mint.deployment_status = DeploymentStatus::Deployed;
        store.put_org(&org)?;
        tracing::info!(org = %org_id, "org marked deployed");
    }
    Ok(())
}
