//! Column family names and database schema.

/// Column family names.
pub mod cf {
    /// Organizations keyed by org id.
    pub const ORGS: &str = "orgs";

    /// Index: slug -> org id.
    pub const ORGS_BY_SLUG: &str = "orgs_by_slug";

    /// Index: Slack team id -> org id.
    pub const ORGS_BY_TEAM: &str = "orgs_by_team";

    /// Users keyed by `org_id || user_id`.
    pub const USERS: &str = "users";

    /// Index: bare user id -> org id (last write wins).
    pub const USERS_BY_ID: &str = "users_by_id";

    /// Tips keyed by transaction hash.
    pub const TIPS: &str = "tips";

    /// Index: `org_id || block_number || tx_hash` -> empty.
    pub const TIPS_BY_ORG: &str = "tips_by_org";

    /// Contract sets keyed by org id.
    pub const ORG_CONTRACTS: &str = "org_contracts";

    /// Index: lowercase contract address -> org id.
    pub const CONTRACTS_BY_ADDRESS: &str = "contracts_by_address";

    /// Token metadata keyed by `org_id || token_id`.
    pub const TOKEN_METADATA: &str = "token_metadata";

    /// Last granted allowance date per org, keyed by org id.
    pub const ALLOWANCE_GRANTS: &str = "allowance_grants";
}

/// All column families that must be opened with the database.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ORGS,
        cf::ORGS_BY_SLUG,
        cf::ORGS_BY_TEAM,
        cf::USERS,
        cf::USERS_BY_ID,
        cf::TIPS,
        cf::TIPS_BY_ORG,
        cf::ORG_CONTRACTS,
        cf::CONTRACTS_BY_ADDRESS,
        cf::TOKEN_METADATA,
        cf::ALLOWANCE_GRANTS,
    ]
}
