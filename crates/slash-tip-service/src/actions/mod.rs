//! Tip action strategies and their registry.
//!
//! The registry maps action type strings to [`TipAction`] implementations.
//! Lookup happens per request off the org's configured action type, so adding
//! a strategy is one `register` call in [`ActionRegistry::standard`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use slash_tip_core::ActionType;
use slash_tip_relay::RelayClient;
use slash_tip_store::RocksStore;

mod mint;
mod poem;
mod send_transaction;
mod types;

pub use mint::MintAction;
pub use poem::PoemAction;
pub use send_transaction::SendTransactionAction;
pub use types::{
    MessageBlock, ResponseKind, TipAction, TipParams, TipResponse, TipResult, ValidationResult,
};

use crate::chain::Chain;
use crate::textgen::TextGenerator;

/// Registry lookup failure.
#[derive(Debug)]
pub enum RegistryError {
    /// No action is registered under the requested type string.
    UnknownAction {
        /// The type string that was requested.
        requested: String,
        /// All registered type strings, sorted.
        available: Vec<&'static str>,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction {
                requested,
                available,
            } => write!(
                f,
                "Unknown action type: {requested}. Available: {}",
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Registry of tip action strategies, keyed by action type string.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn TipAction>>,
}

impl ActionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its own type string. Replaces any action
    /// already registered under the same string.
    pub fn register(&mut self, action: Arc<dyn TipAction>) {
        let key = action.action_type();
        if self.actions.insert(key, action).is_some() {
            tracing::warn!(action = key, "action type already registered, overwriting");
        } else {
            tracing::debug!(action = key, "registered action");
        }
    }

    /// The registry with every built-in strategy.
    #[must_use]
    pub fn standard(
        store: &Arc<RocksStore>,
        chain: Option<&Arc<Chain>>,
        relay: Option<&Arc<RelayClient>>,
        textgen: &Arc<dyn TextGenerator>,
        default_chain_id: u64,
        default_project_id: &str,
    ) -> Self {
        let mut registry = Self::new();
        for action_type in [
            ActionType::Erc1155Mint,
            ActionType::Erc20Mint,
            ActionType::Erc20Vault,
        ] {
            registry.register(Arc::new(MintAction::new(
                action_type,
                Arc::clone(store),
                chain.map(Arc::clone),
                Arc::clone(textgen),
            )));
        }
        registry.register(Arc::new(SendTransactionAction::new(
            Arc::clone(store),
            relay.map(Arc::clone),
            default_chain_id,
            default_project_id.to_string(),
        )));
        registry.register(Arc::new(PoemAction::new(Arc::clone(textgen))));
        registry
    }

    /// Look up the action for a type string.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAction` naming the available types.
    pub fn get(&self, action_type: &str) -> Result<&Arc<dyn TipAction>, RegistryError> {
        self.actions
            .get(action_type)
            .ok_or_else(|| RegistryError::UnknownAction {
                requested: action_type.to_string(),
                available: self.actions.keys().copied().collect(),
            })
    }

    /// All registered action type strings, sorted.
    #[must_use]
    pub fn available(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textgen::NoopTextGenerator;
    use tempfile::TempDir;

    fn standard_registry() -> (TempDir, ActionRegistry) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let textgen: Arc<dyn TextGenerator> = Arc::new(NoopTextGenerator);
        let registry = ActionRegistry::standard(&store, None, None, &textgen, 8453, "proj");
        (dir, registry)
    }

    #[test]
    fn standard_registry_has_all_strategies() {
        let (_dir, registry) = standard_registry();
        assert_eq!(
            registry.available(),
            vec![
                "erc1155_mint",
                "erc20_mint",
                "erc20_vault",
                "poem",
                "send_transaction"
            ]
        );
        assert!(registry.get("erc20_mint").is_ok());
    }

    #[test]
    fn unknown_action_error_names_the_alternatives() {
        let (_dir, registry) = standard_registry();
        let err = registry.get("venmo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown action type: venmo. Available: erc1155_mint, erc20_mint, erc20_vault, poem, send_transaction"
        );
    }
}
