//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use slash_tip_core::{normalize_address, OrgId};

/// Create an org key from an org ID.
#[must_use]
pub fn org_key(org_id: &OrgId) -> Vec<u8> {
    org_id.as_bytes().to_vec()
}

/// Create a slug index key.
#[must_use]
pub fn slug_key(slug: &str) -> Vec<u8> {
    slug.as_bytes().to_vec()
}

/// Create a team-id index key.
#[must_use]
pub fn team_key(team_id: &str) -> Vec<u8> {
    team_id.as_bytes().to_vec()
}

/// Create a user key.
///
/// Format: `org_id (16 bytes) || user_id (utf-8)`
#[must_use]
pub fn user_key(org_id: &OrgId, user_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + user_id.len());
    key.extend_from_slice(org_id.as_bytes());
    key.extend_from_slice(user_id.as_bytes());
    key
}

/// Create a prefix for iterating all users of an org.
#[must_use]
pub fn users_prefix(org_id: &OrgId) -> Vec<u8> {
    org_id.as_bytes().to_vec()
}

/// Create a bare user-id index key.
#[must_use]
pub fn user_id_key(user_id: &str) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a tip key from a transaction hash (lowercased so lookups are
/// case-insensitive).
#[must_use]
pub fn tip_key(tx_hash: &str) -> Vec<u8> {
    tx_hash.to_ascii_lowercase().into_bytes()
}

/// Create an org-tip index key.
///
/// Format: `org_id (16 bytes) || block_number (8 bytes, big-endian) || tx_hash`
///
/// Big-endian block numbers keep an org's tips sorted by chain order.
#[must_use]
pub fn org_tip_key(org_id: &OrgId, block_number: u64, tx_hash: &str) -> Vec<u8> {
    let hash = tx_hash.to_ascii_lowercase();
    let mut key = Vec::with_capacity(24 + hash.len());
    key.extend_from_slice(org_id.as_bytes());
    key.extend_from_slice(&block_number.to_be_bytes());
    key.extend_from_slice(hash.as_bytes());
    key
}

/// Create a prefix for iterating all tips of an org.
#[must_use]
pub fn org_tips_prefix(org_id: &OrgId) -> Vec<u8> {
    org_id.as_bytes().to_vec()
}

/// Extract the transaction hash from an org-tip index key.
///
/// # Panics
///
/// Panics if the key is shorter than 24 bytes or the hash is not UTF-8.
#[must_use]
pub fn extract_tx_hash_from_org_key(key: &[u8]) -> String {
    String::from_utf8(key[24..].to_vec()).expect("tx hash is ascii")
}

/// Create a contract-set key from an org ID.
#[must_use]
pub fn org_contracts_key(org_id: &OrgId) -> Vec<u8> {
    org_id.as_bytes().to_vec()
}

/// Create a contract-address index key (normalized to lowercase).
#[must_use]
pub fn contract_address_key(address: &str) -> Vec<u8> {
    normalize_address(address).into_bytes()
}

/// Create a token metadata key.
///
/// Format: `org_id (16 bytes) || token_id (8 bytes, big-endian)`
#[must_use]
pub fn token_metadata_key(org_id: &OrgId, token_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(24);
    key.extend_from_slice(org_id.as_bytes());
    key.extend_from_slice(&token_id.to_be_bytes());
    key
}

/// Create an allowance-grant key from an org ID.
#[must_use]
pub fn allowance_grant_key(org_id: &OrgId) -> Vec<u8> {
    org_id.as_bytes().to_vec()
}
