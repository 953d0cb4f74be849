//! Registered users.

use serde::{Deserialize, Serialize};

use crate::ids::OrgId;

/// A registered workspace member.
///
/// Keyed by `(org_id, id)`: the external Slack user id is only unique within
/// an organization. The allowance column is the authoritative remaining
/// daily tip budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// External (Slack) user id.
    pub id: String,

    /// Owning organization.
    pub org_id: OrgId,

    /// Display nickname.
    pub nickname: String,

    /// Wallet address tips are delivered to.
    pub address: String,

    /// Remaining daily tip allowance.
    pub allowance: i64,
}

impl User {
    /// Create a user with the given starting allowance.
    #[must_use]
    pub fn new(
        org_id: OrgId,
        id: impl Into<String>,
        nickname: impl Into<String>,
        address: impl Into<String>,
        allowance: i64,
    ) -> Self {
        Self {
            id: id.into(),
            org_id,
            nickname: nickname.into(),
            address: address.into(),
            allowance,
        }
    }
}
