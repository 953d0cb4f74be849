//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use slash_tip_core::{
    normalize_address, Organization, OrgContracts, OrgId, Tip, TokenAmount, TokenMetadata, User,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{LeaderboardEntry, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Fetch a value from a CF and decode it.
    fn get_value<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Resolve an org id stored as a 16-byte index value.
    fn org_id_from_index(&self, cf_name: &str, key: &[u8]) -> Result<Option<OrgId>> {
        let cf = self.cf(cf_name)?;
        let Some(data) = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let bytes: [u8; 16] = data
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::Serialization("index value is not a 16-byte id".into()))?;
        Ok(Some(OrgId::from_bytes(bytes)))
    }

    /// Collect all index keys under a prefix, in key order.
    fn collect_prefix_keys(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));

        let mut all_keys = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            all_keys.push(key.to_vec());
        }
        Ok(all_keys)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Organization Operations
    // =========================================================================

    fn put_org(&self, org: &Organization) -> Result<()> {
        let cf_orgs = self.cf(cf::ORGS)?;
        let cf_by_slug = self.cf(cf::ORGS_BY_SLUG)?;
        let cf_by_team = self.cf(cf::ORGS_BY_TEAM)?;

        let key = keys::org_key(&org.id);
        let value = Self::serialize(org)?;

        let mut batch = WriteBatch::default();

        // Drop stale index entries when the slug or team id changed.
        if let Some(previous) = self.get_org(&org.id)? {
            if previous.slug != org.slug {
                batch.delete_cf(&cf_by_slug, keys::slug_key(&previous.slug));
            }
            if previous.slack_team_id != org.slack_team_id {
                batch.delete_cf(&cf_by_team, keys::team_key(&previous.slack_team_id));
            }
        }

        batch.put_cf(&cf_orgs, &key, &value);
        batch.put_cf(&cf_by_slug, keys::slug_key(&org.slug), org.id.as_bytes());
        batch.put_cf(
            &cf_by_team,
            keys::team_key(&org.slack_team_id),
            org.id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_org(&self, org_id: &OrgId) -> Result<Option<Organization>> {
        self.get_value(cf::ORGS, &keys::org_key(org_id))
    }

    fn get_org_by_slug(&self, slug: &str) -> Result<Option<Organization>> {
        match self.org_id_from_index(cf::ORGS_BY_SLUG, &keys::slug_key(slug))? {
            Some(org_id) => self.get_org(&org_id),
            None => Ok(None),
        }
    }

    fn get_org_by_team_id(&self, team_id: &str) -> Result<Option<Organization>> {
        match self.org_id_from_index(cf::ORGS_BY_TEAM, &keys::team_key(team_id))? {
            Some(org_id) => self.get_org(&org_id),
            None => Ok(None),
        }
    }

    fn list_orgs(&self) -> Result<Vec<Organization>> {
        let cf = self.cf(cf::ORGS)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut orgs = Vec::new();
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            orgs.push(Self::deserialize(&value)?);
        }
        Ok(orgs)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    fn upsert_user(&self, user: &User) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_id = self.cf(cf::USERS_BY_ID)?;

        let key = keys::user_key(&user.org_id, &user.id);
        let value = Self::serialize(user)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, &key, &value);
        batch.put_cf(
            &cf_by_id,
            keys::user_id_key(&user.id),
            user.org_id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_user(&self, org_id: &OrgId, user_id: &str) -> Result<Option<User>> {
        self.get_value(cf::USERS, &keys::user_key(org_id, user_id))
    }

    fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        match self.org_id_from_index(cf::USERS_BY_ID, &keys::user_id_key(user_id))? {
            Some(org_id) => self.get_user(&org_id, user_id),
            None => Ok(None),
        }
    }

    fn list_users_by_org(&self, org_id: &OrgId) -> Result<Vec<User>> {
        let cf = self.cf(cf::USERS)?;
        let prefix = keys::users_prefix(org_id);
        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut users = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            users.push(Self::deserialize(&value)?);
        }
        Ok(users)
    }

    fn remove_user(&self, org_id: &OrgId, user_id: &str) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_id = self.cf(cf::USERS_BY_ID)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_users, keys::user_key(org_id, user_id));

        // Only drop the global index entry if it still points at this org.
        if let Some(indexed) = self.org_id_from_index(cf::USERS_BY_ID, &keys::user_id_key(user_id))?
        {
            if indexed == *org_id {
                batch.delete_cf(&cf_by_id, keys::user_id_key(user_id));
            }
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Tip Operations
    // =========================================================================

    fn upsert_tip(&self, tip: &Tip) -> Result<()> {
        let cf_tips = self.cf(cf::TIPS)?;
        let cf_by_org = self.cf(cf::TIPS_BY_ORG)?;

        let key = keys::tip_key(&tip.tx_hash);

        let mut stored = tip.clone();
        let mut batch = WriteBatch::default();

        if let Some(existing) = self.get_tip(&tip.tx_hash)? {
            // Replays update in place; the first observation wins created_at.
            stored.created_at = existing.created_at;

            if existing.block_number != tip.block_number || existing.org_id != tip.org_id {
                batch.delete_cf(
                    &cf_by_org,
                    keys::org_tip_key(&existing.org_id, existing.block_number, &existing.tx_hash),
                );
            }
        }

        let value = Self::serialize(&stored)?;
        batch.put_cf(&cf_tips, &key, &value);
        batch.put_cf(
            &cf_by_org,
            keys::org_tip_key(&tip.org_id, tip.block_number, &tip.tx_hash),
            [],
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_tip(&self, tx_hash: &str) -> Result<Option<Tip>> {
        self.get_value(cf::TIPS, &keys::tip_key(tx_hash))
    }

    fn list_tips_by_org(&self, org_id: &OrgId, limit: usize) -> Result<Vec<Tip>> {
        let prefix = keys::org_tips_prefix(org_id);
        let mut all_keys = self.collect_prefix_keys(cf::TIPS_BY_ORG, &prefix)?;

        // Keys sort oldest block first; reverse for newest first.
        all_keys.reverse();

        let mut tips = Vec::new();
        for key in all_keys {
            if tips.len() >= limit {
                break;
            }
            let tx_hash = keys::extract_tx_hash_from_org_key(&key);
            if let Some(tip) = self.get_tip(&tx_hash)? {
                tips.push(tip);
            }
        }
        Ok(tips)
    }

    fn leaderboard(&self, org_id: &OrgId) -> Result<Vec<LeaderboardEntry>> {
        let users = self.list_users_by_org(org_id)?;
        let mut totals: HashMap<String, (String, TokenAmount)> = users
            .into_iter()
            .map(|u| (u.id, (u.nickname, TokenAmount::ZERO)))
            .collect();

        let prefix = keys::org_tips_prefix(org_id);
        for key in self.collect_prefix_keys(cf::TIPS_BY_ORG, &prefix)? {
            let tx_hash = keys::extract_tx_hash_from_org_key(&key);
            let Some(tip) = self.get_tip(&tx_hash)? else {
                continue;
            };
            if let Some((_, total)) = totals.get_mut(&tip.to_user_id) {
                *total = total
                    .checked_add(tip.amount)
                    .unwrap_or(TokenAmount::new(u128::MAX));
            }
        }

        let mut entries: Vec<LeaderboardEntry> = totals
            .into_iter()
            .map(|(user_id, (nickname, total))| LeaderboardEntry {
                user_id,
                nickname,
                total,
            })
            .collect();

        entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(entries)
    }

    // =========================================================================
    // Contract Mapping Operations
    // =========================================================================

    fn upsert_org_contracts(&self, contracts: &OrgContracts) -> Result<()> {
        let cf_contracts = self.cf(cf::ORG_CONTRACTS)?;
        let cf_by_address = self.cf(cf::CONTRACTS_BY_ADDRESS)?;

        let key = keys::org_contracts_key(&contracts.org_id);
        let value = Self::serialize(contracts)?;
        let new_addresses = contracts.addresses();

        let mut batch = WriteBatch::default();

        // Remove reverse entries for addresses no longer in the set.
        if let Some(previous) = self.get_org_contracts(&contracts.org_id)? {
            for address in previous.addresses() {
                if !new_addresses.contains(&address) {
                    batch.delete_cf(&cf_by_address, keys::contract_address_key(&address));
                }
            }
        }

        batch.put_cf(&cf_contracts, &key, &value);
        for address in &new_addresses {
            batch.put_cf(
                &cf_by_address,
                keys::contract_address_key(address),
                contracts.org_id.as_bytes(),
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_org_contracts(&self, org_id: &OrgId) -> Result<Option<OrgContracts>> {
        self.get_value(cf::ORG_CONTRACTS, &keys::org_contracts_key(org_id))
    }

    fn find_org_contracts_by_address(&self, address: &str) -> Result<Option<OrgContracts>> {
        match self
            .org_id_from_index(cf::CONTRACTS_BY_ADDRESS, &keys::contract_address_key(address))?
        {
            Some(org_id) => self.get_org_contracts(&org_id),
            None => Ok(None),
        }
    }

    fn set_tip_action_address(
        &self,
        slash_tip_address: &str,
        tip_action_address: &str,
    ) -> Result<Option<OrgContracts>> {
        let Some(mut contracts) = self.find_org_contracts_by_address(slash_tip_address)? else {
            return Ok(None);
        };

        if normalize_address(&contracts.slash_tip_address)
            != normalize_address(slash_tip_address)
        {
            // The address matched some other contract in the set, not the
            // entry point; treat as no match.
            return Ok(None);
        }

        contracts.tip_action_address = tip_action_address.to_string();
        self.upsert_org_contracts(&contracts)?;
        Ok(Some(contracts))
    }

    // =========================================================================
    // Token Metadata Operations
    // =========================================================================

    fn upsert_token_metadata(&self, metadata: &TokenMetadata) -> Result<()> {
        let cf = self.cf(cf::TOKEN_METADATA)?;
        let key = keys::token_metadata_key(&metadata.org_id, metadata.token_id);

        let mut stored = metadata.clone();
        if let Some(existing) = self.get_token_metadata(&metadata.org_id, metadata.token_id)? {
            stored.created_at = existing.created_at;
        }
        stored.updated_at = chrono::Utc::now();

        let value = Self::serialize(&stored)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_token_metadata(&self, org_id: &OrgId, token_id: u64) -> Result<Option<TokenMetadata>> {
        self.get_value(cf::TOKEN_METADATA, &keys::token_metadata_key(org_id, token_id))
    }

    // =========================================================================
    // Allowance Operations
    // =========================================================================

    fn deduct_allowance(&self, org_id: &OrgId, user_id: &str, amount: i64) -> Result<i64> {
        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(org_id, user_id);

        let mut user = self
            .get_user(org_id, user_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            })?;

        if user.allowance < amount {
            return Err(StoreError::InsufficientAllowance {
                remaining: user.allowance,
                required: amount,
            });
        }

        user.allowance -= amount;

        let value = Self::serialize(&user)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.allowance)
    }

    fn grant_daily_allowance(&self, org_id: &OrgId, amount: i64, date: NaiveDate) -> Result<bool> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_grants = self.cf(cf::ALLOWANCE_GRANTS)?;

        let grant_key = keys::allowance_grant_key(org_id);
        let date_marker = date.format("%Y-%m-%d").to_string();

        let already_granted = self
            .db
            .get_cf(&cf_grants, &grant_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some_and(|marker| marker == date_marker.as_bytes());

        if already_granted {
            return Ok(false);
        }

        let mut batch = WriteBatch::default();
        for mut user in self.list_users_by_org(org_id)? {
            user.allowance = user.allowance.saturating_add(amount);
            let key = keys::user_key(org_id, &user.id);
            let value = Self::serialize(&user)?;
            batch.put_cf(&cf_users, &key, &value);
        }
        batch.put_cf(&cf_grants, &grant_key, date_marker.as_bytes());

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(true)
    }
}
