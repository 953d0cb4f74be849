//! Core types and utilities for slash-tip.
//!
//! This crate provides the foundational types used throughout the slash-tip
//! platform:
//!
//! - **Identifiers**: `OrgId`
//! - **Organizations**: `Organization`, `ActionType`, `ActionConfig`
//! - **Users**: `User`
//! - **Tips**: `Tip`
//! - **Contracts**: `OrgContracts`
//! - **Metadata**: `TokenMetadata`
//! - **Amounts**: `TokenAmount`
//!
//! # Token Amounts
//!
//! On-chain amounts are carried as [`TokenAmount`], a `u128` serialized as a
//! decimal string. Arithmetic is checked: overflow is an error, never a
//! silent truncation. JSON numbers are never used for amounts because they
//! lose precision past 53 bits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod amount;
pub mod contract;
pub mod error;
pub mod ids;
pub mod metadata;
pub mod org;
pub mod tip;
pub mod user;

pub use action::{
    ActionConfig, ActionType, DeploymentStatus, MintConfig, PoemConfig, PoemStyle,
    SendTransactionConfig,
};
pub use amount::TokenAmount;
pub use contract::{normalize_address, OrgContracts};
pub use error::{Result, TipError};
pub use ids::{IdError, OrgId};
pub use metadata::TokenMetadata;
pub use org::{Organization, DEFAULT_DAILY_ALLOWANCE};
pub use tip::Tip;
pub use user::User;
