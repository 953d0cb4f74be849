//! Tip records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::ids::OrgId;

/// An immutable record of one transfer, keyed by transaction hash.
///
/// The hash is the idempotency key: re-observing the same hash updates the
/// existing row in place (last write wins on the mutable fields) and never
/// creates a duplicate. Rows are written exclusively by the event ingestion
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Transaction hash (globally unique).
    pub tx_hash: String,

    /// Owning organization.
    pub org_id: OrgId,

    /// Sender's external user id.
    pub from_user_id: String,

    /// Recipient's external user id.
    pub to_user_id: String,

    /// Token id (0 for single-token and ERC20 setups).
    pub token_id: u64,

    /// Amount in base units.
    pub amount: TokenAmount,

    /// Free-text message attached to the tip.
    pub message: Option<String>,

    /// Block the transaction was mined in.
    pub block_number: u64,

    /// Timestamp of that block.
    pub block_timestamp: DateTime<Utc>,

    /// When this row was first recorded.
    pub created_at: DateTime<Utc>,
}
