//! Events delivered by the chain indexer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slash_tip_core::{OrgId, TokenAmount};

/// One on-chain event, as delivered by the indexer webhook.
///
/// The `type` tag carries the event name; field names are camelCase to match
/// the indexer's JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChainEvent {
    /// The factory deployed an organization's contract set.
    #[serde(rename_all = "camelCase")]
    OrgDeployed {
        /// Organization id, echoed back from the deploy call.
        org_id: OrgId,
        /// The slash-tip entry-point contract.
        slash_tip: String,
        /// The user-registry contract.
        user_registry: String,
        /// The action contract.
        tip_action: String,
        /// The token contract, when the setup mints one.
        tip_token: Option<String>,
    },

    /// A per-org contract emitted a tip.
    #[serde(rename_all = "camelCase")]
    Tipped {
        /// Emitting contract address.
        contract: String,
        /// Transaction hash.
        tx_hash: String,
        /// Sender's external user id.
        from_user_id: String,
        /// Recipient's external user id.
        to_user_id: String,
        /// Token id.
        token_id: u64,
        /// Amount in base units.
        amount: TokenAmount,
        /// Free-text message, if any.
        message: Option<String>,
        /// Block the transaction was mined in.
        block_number: u64,
        /// Timestamp of that block.
        block_timestamp: DateTime<Utc>,
    },

    /// Legacy ERC1155 transfer; user ids live in the transaction input.
    #[serde(rename_all = "camelCase")]
    TransferSingle {
        /// Emitting contract address.
        contract: String,
        /// Transaction hash.
        tx_hash: String,
        /// Operator address.
        operator: String,
        /// Sending address (zero for mints).
        from: String,
        /// Receiving address (zero for burns).
        to: String,
        /// Token id.
        token_id: u64,
        /// Amount in base units.
        amount: TokenAmount,
        /// Hex-encoded transaction input.
        input: String,
        /// Block the transaction was mined in.
        block_number: u64,
        /// Timestamp of that block.
        block_timestamp: DateTime<Utc>,
    },

    /// A user was registered on a user-registry contract.
    #[serde(rename_all = "camelCase")]
    UserAdded {
        /// Emitting contract address.
        contract: String,
        /// External user id.
        user_id: String,
        /// Display nickname.
        nickname: String,
        /// Wallet address.
        address: String,
        /// Starting allowance, when the contract carries one.
        allowance: Option<i64>,
    },

    /// A user was removed from a user-registry contract.
    #[serde(rename_all = "camelCase")]
    UserRemoved {
        /// Emitting contract address.
        contract: String,
        /// External user id.
        user_id: String,
    },

    /// An org's slash-tip contract was pointed at a new action contract.
    #[serde(rename_all = "camelCase")]
    TipActionUpdated {
        /// The slash-tip contract that was updated.
        contract: String,
        /// The new action contract address.
        tip_action: String,
    },
}

impl ChainEvent {
    /// The event name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrgDeployed { .. } => "OrgDeployed",
            Self::Tipped { .. } => "Tipped",
            Self::TransferSingle { .. } => "TransferSingle",
            Self::UserAdded { .. } => "UserAdded",
            Self::UserRemoved { .. } => "UserRemoved",
            Self::TipActionUpdated { .. } => "TipActionUpdated",
        }
    }
}
