//! Per-organization deployed contract addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OrgId;

/// The contract set the factory deployed for one organization.
///
/// Written when an `OrgDeployed` event is ingested; the tip-action address is
/// swapped in place when a `TipActionUpdated` event arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgContracts {
    /// Owning organization.
    pub org_id: OrgId,

    /// The slash-tip entry-point contract.
    pub slash_tip_address: String,

    /// The user-registry contract.
    pub user_registry_address: String,

    /// The action contract slash-tip delegates to.
    pub tip_action_address: String,

    /// The token contract, when the setup mints one.
    pub tip_token_address: Option<String>,

    /// When the deployment was observed.
    pub deployed_at: DateTime<Utc>,
}

impl OrgContracts {
    /// All known addresses for reverse-index maintenance, lowercased.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses = vec![
            normalize_address(&self.slash_tip_address),
            normalize_address(&self.user_registry_address),
            normalize_address(&self.tip_action_address),
        ];
        if let Some(token) = &self.tip_token_address {
            addresses.push(normalize_address(token));
        }
        addresses
    }
}

/// Lowercase an address so lookups are case-insensitive.
///
/// Event sources disagree on checksum casing, so every address is normalized
/// before it is used as a key.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_normalized() {
        let contracts = OrgContracts {
            org_id: OrgId::generate(),
            slash_tip_address: "0xAAbB".into(),
            user_registry_address: "0xCCdd".into(),
            tip_action_address: "0xEEff".into(),
            tip_token_address: None,
            deployed_at: Utc::now(),
        };
        assert_eq!(contracts.addresses(), vec!["0xaabb", "0xccdd", "0xeeff"]);
    }
}
