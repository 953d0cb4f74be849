//! Per-organization action configuration.
//!
//! Each organization selects one action type, and the same column holds a
//! differently-shaped config blob per type. The blob is a tagged union keyed
//! by the action type string, so every consumption site matches exhaustively
//! and a new action type is a compile-time exercise.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The strategy an organization uses to fulfil a `/tip` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Mint an ERC1155 token to the recipient.
    Erc1155Mint,

    /// Mint an ERC20 token to the recipient (amount scaled by decimals).
    Erc20Mint,

    /// Transfer an existing ERC20 token out of a pre-funded vault.
    Erc20Vault,

    /// Dispatch an arbitrary templated contract call through the relay.
    SendTransaction,

    /// Generate a poem instead of moving value.
    Poem,
}

impl ActionType {
    /// The canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Erc1155Mint => "erc1155_mint",
            Self::Erc20Mint => "erc20_mint",
            Self::Erc20Vault => "erc20_vault",
            Self::SendTransaction => "send_transaction",
            Self::Poem => "poem",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "erc1155_mint" => Ok(Self::Erc1155Mint),
            "erc20_mint" => Ok(Self::Erc20Mint),
            "erc20_vault" => Ok(Self::Erc20Vault),
            "send_transaction" => Ok(Self::SendTransaction),
            "poem" => Ok(Self::Poem),
            other => Err(format!("unknown action type: {other}")),
        }
    }
}

/// Deployment lifecycle of an organization's contract set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// Deployment submitted but the factory event has not been ingested yet.
    #[default]
    Pending,

    /// Contract addresses are known and tips can be executed.
    Deployed,
}

/// Config blob for the mint-style actions (ERC1155, ERC20, ERC20 vault).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MintConfig {
    /// The org's slash-tip contract, once deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slash_tip_address: Option<String>,

    /// The org's user-registry contract, once deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_registry_address: Option<String>,

    /// The ERC1155 token id being minted (ignored for ERC20).
    #[serde(default)]
    pub token_id: u64,

    /// ERC20 decimals; `None` means the default of 18. ERC1155 never scales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,

    /// Whether the contract set has been deployed.
    #[serde(default)]
    pub deployment_status: DeploymentStatus,
}

/// Config blob for the templated-transaction action.
///
/// The arg template supports the placeholders `{{fromUserId}}`,
/// `{{toUserId}}`, `{{amount}}`, `{{message}}` and `{{recipientAddress}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTransactionConfig {
    /// Target contract address.
    pub contract_address: String,

    /// Full function signature, e.g. `"tip(string from, string to, uint256 amount)"`.
    pub function_signature: String,

    /// Named argument template with placeholders.
    #[serde(default)]
    pub args: Map<String, Value>,

    /// Chain id override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    /// Relay project id override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Custom broadcast text shown on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

/// Config blob for the poem action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoemConfig {
    /// Requested poem style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PoemStyle>,
}

/// Poem styles the text generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoemStyle {
    /// 5-7-5.
    Haiku,
    /// Five lines, AABBA.
    Limerick,
    /// Fourteen lines.
    Sonnet,
    /// No constraints.
    Free,
}

/// The per-organization action config, tagged by action type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionConfig {
    /// Config for [`ActionType::Erc1155Mint`].
    Erc1155Mint(MintConfig),

    /// Config for [`ActionType::Erc20Mint`].
    Erc20Mint(MintConfig),

    /// Config for [`ActionType::Erc20Vault`].
    Erc20Vault(MintConfig),

    /// Config for [`ActionType::SendTransaction`].
    SendTransaction(SendTransactionConfig),

    /// Config for [`ActionType::Poem`].
    Poem(PoemConfig),
}

impl ActionConfig {
    /// The action type this config shape belongs to.
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::Erc1155Mint(_) => ActionType::Erc1155Mint,
            Self::Erc20Mint(_) => ActionType::Erc20Mint,
            Self::Erc20Vault(_) => ActionType::Erc20Vault,
            Self::SendTransaction(_) => ActionType::SendTransaction,
            Self::Poem(_) => ActionType::Poem,
        }
    }

    /// The mint config, if this is one of the mint-style variants.
    #[must_use]
    pub const fn as_mint(&self) -> Option<&MintConfig> {
        match self {
            Self::Erc1155Mint(c) | Self::Erc20Mint(c) | Self::Erc20Vault(c) => Some(c),
            Self::SendTransaction(_) | Self::Poem(_) => None,
        }
    }

    /// A mutable mint config, if this is one of the mint-style variants.
    pub fn as_mint_mut(&mut self) -> Option<&mut MintConfig> {
        match self {
            Self::Erc1155Mint(c) | Self::Erc20Mint(c) | Self::Erc20Vault(c) => Some(c),
            Self::SendTransaction(_) | Self::Poem(_) => None,
        }
    }

    /// The send-transaction config, if that is this config's shape.
    #[must_use]
    pub const fn as_send_transaction(&self) -> Option<&SendTransactionConfig> {
        match self {
            Self::SendTransaction(c) => Some(c),
            _ => None,
        }
    }

    /// The poem config, if that is this config's shape.
    #[must_use]
    pub const fn as_poem(&self) -> Option<&PoemConfig> {
        match self {
            Self::Poem(c) => Some(c),
            _ => None,
        }
    }
}
