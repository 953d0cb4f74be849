//! Shared application state.

use std::sync::Arc;

use slash_tip_indexer::Ingestor;
use slash_tip_relay::RelayClient;
use slash_tip_store::RocksStore;

use crate::actions::ActionRegistry;
use crate::chain::Chain;
use crate::config::ServiceConfig;
use crate::textgen::{ChatTextGenerator, NoopTextGenerator, TextGenerator};

/// Application state shared across request handlers.
pub struct AppState {
    /// Persistent store.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Chain operations; `None` when no relay is configured.
    pub chain: Option<Arc<Chain>>,

    /// Raw relay client for templated transactions.
    pub relay: Option<Arc<RelayClient>>,

    /// Tip action registry.
    pub registry: ActionRegistry,

    /// Chain-event ingestor backing the indexer webhook.
    pub ingestor: Ingestor,

    /// Poem generator.
    pub textgen: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Build the application state from configuration and an open store.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let relay = match (&config.relay_api_url, &config.relay_api_key) {
            (Some(url), Some(key)) => Some(Arc::new(RelayClient::new(url.clone(), key.clone()))),
            _ => {
                tracing::warn!("relay not configured, on-chain tipping disabled");
                None
            }
        };

        let chain = relay.as_ref().map(|relay| {
            Arc::new(Chain::new(
                relay.as_ref().clone(),
                Arc::clone(&store),
                config.chain_id,
                config.relay_project_id.clone(),
                config.factory_address.clone(),
                config.admin_address.clone(),
                config.operator_addresses.clone(),
            ))
        });

        let textgen: Arc<dyn TextGenerator> =
            match (&config.textgen_api_url, &config.textgen_api_key) {
                (Some(url), Some(key)) => Arc::new(ChatTextGenerator::new(
                    url.clone(),
                    key.clone(),
                    config.textgen_model.clone(),
                )),
                _ => {
                    tracing::info!("text generation not configured, poems use fallbacks");
                    Arc::new(NoopTextGenerator)
                }
            };

        let registry = ActionRegistry::standard(
            &store,
            chain.as_ref(),
            relay.as_ref(),
            &textgen,
            config.chain_id,
            &config.relay_project_id,
        );
        let ingestor = Ingestor::new(Arc::<RocksStore>::clone(&store) as Arc<dyn slash_tip_store::Store>);

        Self {
            store,
            config,
            chain,
            relay,
            registry,
            ingestor,
            textgen,
        }
    }
}
