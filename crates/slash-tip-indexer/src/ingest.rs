//! Applying chain events to the store.

use std::sync::Arc;

use chrono::Utc;

use slash_tip_core::{normalize_address, OrgContracts, Tip, User, DEFAULT_DAILY_ALLOWANCE};
use slash_tip_store::{Store, StoreError};

use crate::decode::decode_tip_call;
use crate::event::ChainEvent;

/// The zero address, marking mint and burn legs of a transfer.
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Errors that can occur applying an event.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Storage failed; the delivery should be retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to a delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event was applied to the store.
    Applied,

    /// The event was intentionally not applied.
    Skipped(String),
}

impl Outcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

/// Applies indexer events to the store.
///
/// Skips (with a warning) events whose dependencies are missing or whose
/// payload cannot be decoded; only storage failures are errors.
pub struct Ingestor {
    store: Arc<dyn Store>,
}

impl Ingestor {
    /// Create an ingestor over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails; every data-shaped problem
    /// (unknown contract, undecodable input) is an `Outcome::Skipped`.
    pub fn handle(&self, event: &ChainEvent) -> Result<Outcome, IngestError> {
        let outcome = match event {
            ChainEvent::OrgDeployed {
                org_id,
                slash_tip,
                user_registry,
                tip_action,
                tip_token,
            } => {
                self.store.upsert_org_contracts(&OrgContracts {
                    org_id: *org_id,
                    slash_tip_address: slash_tip.clone(),
                    user_registry_address: user_registry.clone(),
                    tip_action_address: tip_action.clone(),
                    tip_token_address: tip_token.clone(),
                    deployed_at: Utc::now(),
                })?;
                Outcome::Applied
            }

            ChainEvent::Tipped {
                contract,
                tx_hash,
                from_user_id,
                to_user_id,
                token_id,
                amount,
                message,
                block_number,
                block_timestamp,
            } => match self.store.find_org_contracts_by_address(contract)? {
                Some(contracts) => {
                    self.store.upsert_tip(&Tip {
                        tx_hash: tx_hash.clone(),
                        org_id: contracts.org_id,
                        from_user_id: from_user_id.clone(),
                        to_user_id: to_user_id.clone(),
                        token_id: *token_id,
                        amount: *amount,
                        message: message.clone(),
                        block_number: *block_number,
                        block_timestamp: *block_timestamp,
                        created_at: Utc::now(),
                    })?;
                    Outcome::Applied
                }
                None => Outcome::skipped(format!("no org for contract {contract}")),
            },

            ChainEvent::TransferSingle {
                contract,
                tx_hash,
                from,
                to,
                token_id,
                input,
                block_number,
                block_timestamp,
                ..
            } => {
                if normalize_address(from) == ZERO_ADDRESS
                    || normalize_address(to) == ZERO_ADDRESS
                {
                    return Ok(Outcome::skipped("mint or burn leg"));
                }

                let call = match decode_tip_call(input) {
                    Ok(call) => call,
                    Err(e) => return Ok(Outcome::skipped(format!("undecodable input: {e}"))),
                };

                // Resolve the org from the emitting contract; legacy global
                // contract transfers fall back to the sender's registration.
                let org_id = match self.store.find_org_contracts_by_address(contract)? {
                    Some(contracts) => Some(contracts.org_id),
                    None => self
                        .store
                        .find_user(&call.from_user_id)?
                        .map(|user| user.org_id),
                };
                let Some(org_id) = org_id else {
                    return Ok(Outcome::skipped(format!(
                        "no org for contract {contract} or sender {}",
                        call.from_user_id
                    )));
                };

                self.store.upsert_tip(&Tip {
                    tx_hash: tx_hash.clone(),
                    org_id,
                    from_user_id: call.from_user_id,
                    to_user_id: call.to_user_id,
                    token_id: call.token_id.unwrap_or(*token_id),
                    amount: call.amount,
                    message: call.message,
                    block_number: *block_number,
                    block_timestamp: *block_timestamp,
                    created_at: Utc::now(),
                })?;
                Outcome::Applied
            }

            ChainEvent::UserAdded {
                contract,
                user_id,
                nickname,
                address,
                allowance,
            } => match self.store.find_org_contracts_by_address(contract)? {
                Some(contracts) => {
                    let org_id = contracts.org_id;

                    // Replays must not reset a spent allowance.
                    let allowance = match self.store.get_user(&org_id, user_id)? {
                        Some(existing) => existing.allowance,
                        None => match allowance {
                            Some(value) => *value,
                            None => self
                                .store
                                .get_org(&org_id)?
                                .map_or(DEFAULT_DAILY_ALLOWANCE, |org| org.daily_allowance),
                        },
                    };

                    self.store
                        .upsert_user(&User::new(org_id, user_id, nickname, address, allowance))?;
                    Outcome::Applied
                }
                None => Outcome::skipped(format!("no org for contract {contract}")),
            },

            ChainEvent::UserRemoved { contract, user_id } => {
                match self.store.find_org_contracts_by_address(contract)? {
                    Some(contracts) => {
                        self.store.remove_user(&contracts.org_id, user_id)?;
                        Outcome::Applied
                    }
                    None => Outcome::skipped(format!("no org for contract {contract}")),
                }
            }

            ChainEvent::TipActionUpdated {
                contract,
                tip_action,
            } => match self.store.set_tip_action_address(contract, tip_action)? {
                Some(_) => Outcome::Applied,
                None => Outcome::skipped(format!("no contract mapping for {contract}")),
            },
        };

        if let Outcome::Skipped(reason) = &outcome {
            tracing::warn!(event = event.name(), %reason, "skipping event");
        }
        Ok(outcome)
    }
}
