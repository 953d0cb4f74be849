//! RocksDB ledger storage for slash-tip.
//!
//! This crate is the single owner of persistence and uniqueness enforcement:
//! organizations, users, tips, per-org contract addresses and token metadata
//! all live here, behind upsert operations keyed by natural keys so that
//! event replays are safe.
//!
//! # Architecture
//!
//! Storage uses `RocksDB` column families (see [`schema`]):
//!
//! - `orgs` plus slug/team-id indexes
//! - `users` keyed by `org_id || user_id`, plus a global user-id index for
//!   legacy event resolution
//! - `tips` keyed by transaction hash (the idempotency key), plus a
//!   block-ordered per-org index
//! - `org_contracts` keyed by org id, plus a reverse index on every deployed
//!   address
//! - `token_metadata` keyed by `(org_id, token_id)`
//! - `allowance_grants` recording the last daily top-up date per org
//!
//! # Example
//!
//! ```no_run
//! use slash_tip_store::{RocksStore, Store};
//! use slash_tip_core::Organization;
//!
//! let store = RocksStore::open("/tmp/slash-tip-db").unwrap();
//!
//! let org = Organization::new("acme", "Acme Inc", "T0123", "xoxb-token");
//! store.put_org(&org).unwrap();
//!
//! let by_slug = store.get_org_by_slug("acme").unwrap();
//! assert!(by_slug.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use slash_tip_core::{Organization, OrgContracts, OrgId, Tip, TokenAmount, TokenMetadata, User};

/// One row of the leaderboard aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Recipient's external user id.
    pub user_id: String,

    /// Recipient's nickname.
    pub nickname: String,

    /// Sum of tip amounts received.
    pub total: TokenAmount,
}

/// The storage trait defining all ledger operations.
///
/// Missing rows are `Ok(None)` or an empty vec, never an error. Database and
/// serialization failures propagate and are treated as fatal by callers.
pub trait Store: Send + Sync {
    // =========================================================================
    // Organization Operations
    // =========================================================================

    /// Insert or update an organization (also maintains slug/team indexes).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_org(&self, org: &Organization) -> Result<()>;

    /// Get an organization by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_org(&self, org_id: &OrgId) -> Result<Option<Organization>>;

    /// Get an organization by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_org_by_slug(&self, slug: &str) -> Result<Option<Organization>>;

    /// Get an organization by Slack team id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_org_by_team_id(&self, team_id: &str) -> Result<Option<Organization>>;

    /// List all organizations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_orgs(&self) -> Result<Vec<Organization>>;

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or update a user by `(org_id, id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_user(&self, user: &User) -> Result<()>;

    /// Get a user within an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, org_id: &OrgId, user_id: &str) -> Result<Option<User>>;

    /// Find a user by bare external id across organizations (last write
    /// wins). Exists only for legacy events that carry no org context.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_user(&self, user_id: &str) -> Result<Option<User>>;

    /// List all users of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users_by_org(&self, org_id: &OrgId) -> Result<Vec<User>>;

    /// Hard-delete a user. Deleting a missing user is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn remove_user(&self, org_id: &OrgId, user_id: &str) -> Result<()>;

    // =========================================================================
    // Tip Operations
    // =========================================================================

    /// Insert or update a tip by transaction hash.
    ///
    /// Safe to call concurrently with the same hash: the hash is immutable
    /// and mutable fields resolve last-write-wins. The original
    /// `created_at` is preserved on update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_tip(&self, tip: &Tip) -> Result<()>;

    /// Get a tip by transaction hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_tip(&self, tx_hash: &str) -> Result<Option<Tip>>;

    /// List an org's tips, newest block first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_tips_by_org(&self, org_id: &OrgId, limit: usize) -> Result<Vec<Tip>>;

    /// Sum tips received per recipient, restricted to the org's registered
    /// users, descending by total.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn leaderboard(&self, org_id: &OrgId) -> Result<Vec<LeaderboardEntry>>;

    // =========================================================================
    // Contract Mapping Operations
    // =========================================================================

    /// Insert or update an org's contract set (also maintains the reverse
    /// address index, removing entries for replaced addresses).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_org_contracts(&self, contracts: &OrgContracts) -> Result<()>;

    /// Get an org's contract set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_org_contracts(&self, org_id: &OrgId) -> Result<Option<OrgContracts>>;

    /// Reverse lookup: find the contract set containing any of the deployed
    /// addresses (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_org_contracts_by_address(&self, address: &str) -> Result<Option<OrgContracts>>;

    /// Swap the tip-action address on the mapping that owns the given
    /// slash-tip address. Returns the updated mapping, or `None` if no
    /// mapping matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn set_tip_action_address(
        &self,
        slash_tip_address: &str,
        tip_action_address: &str,
    ) -> Result<Option<OrgContracts>>;

    // =========================================================================
    // Token Metadata Operations
    // =========================================================================

    /// Insert or update metadata by `(org_id, token_id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_token_metadata(&self, metadata: &TokenMetadata) -> Result<()>;

    /// Get metadata for one token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_token_metadata(&self, org_id: &OrgId, token_id: u64) -> Result<Option<TokenMetadata>>;

    // =========================================================================
    // Allowance Operations (off-chain source of truth)
    // =========================================================================

    /// Deduct from a user's remaining daily allowance, returning the new
    /// remaining value.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientAllowance` if the remaining allowance is
    ///   smaller than `amount`.
    fn deduct_allowance(&self, org_id: &OrgId, user_id: &str, amount: i64) -> Result<i64>;

    /// Add `amount` to every registered user of the org, at most once per
    /// calendar date. Returns `true` if the grant was applied, `false` if
    /// the date was already granted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn grant_daily_allowance(&self, org_id: &OrgId, amount: i64, date: NaiveDate) -> Result<bool>;
}
