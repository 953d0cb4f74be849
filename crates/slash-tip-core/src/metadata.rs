//! Token display metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OrgId;

/// Display metadata for one (org, token id) pair.
///
/// Upserted by the admin edit flow; unique on `(org_id, token_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Owning organization.
    pub org_id: OrgId,

    /// Token id within the org's contract.
    pub token_id: u64,

    /// Token name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Optional image URL.
    pub image: Option<String>,

    /// Display decimals (0 for NFT-style tokens).
    pub decimals: u32,

    /// Arbitrary extra properties.
    pub properties: Option<serde_json::Value>,

    /// When this row was first created.
    pub created_at: DateTime<Utc>,

    /// When this row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TokenMetadata {
    /// Create metadata with just a name.
    #[must_use]
    pub fn new(org_id: OrgId, token_id: u64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            org_id,
            token_id,
            name: name.into(),
            description: None,
            image: None,
            decimals: 0,
            properties: None,
            created_at: now,
            updated_at: now,
        }
    }
}
