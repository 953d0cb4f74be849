//! Mint-style tip actions (ERC1155, ERC20, ERC20 vault).
//!
//! All three share the same contract entry point and validation; they differ
//! only in whether the amount is scaled by token decimals before submission.

use std::sync::Arc;

use async_trait::async_trait;

use slash_tip_core::{ActionType, DeploymentStatus, MintConfig, Organization, TokenAmount};
use slash_tip_store::{RocksStore, Store};

use crate::actions::types::{MessageBlock, TipAction, TipParams, TipResponse, TipResult, ValidationResult};
use crate::chain::Chain;
use crate::textgen::{self, TextGenerator};

/// Generic failure shown when a submission does not go through.
const TRANSACTION_FAILED: &str = "Transaction failed. Please try again.";

/// The daily-allowance star glyph Slack users see.
const STAR: &str = "\u{273a}";

/// Tip action that mints (or vault-transfers) tokens through the org's
/// slash-tip contract.
pub struct MintAction {
    action_type: ActionType,
    store: Arc<RocksStore>,
    chain: Option<Arc<Chain>>,
    textgen: Arc<dyn TextGenerator>,
}

impl MintAction {
    /// Create a mint action for one of the mint-style action types.
    #[must_use]
    pub fn new(
        action_type: ActionType,
        store: Arc<RocksStore>,
        chain: Option<Arc<Chain>>,
        textgen: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            action_type,
            store,
            chain,
            textgen,
        }
    }

    fn mint_config<'a>(&self, org: &'a Organization) -> Option<&'a MintConfig> {
        org.action_config.as_ref().and_then(|c| c.as_mint())
    }

    /// The submitted base-unit amount: ERC1155 tips whole token counts,
    /// ERC20 variants scale by the token's decimals.
    fn chain_amount(&self, config: &MintConfig, amount: u64) -> Option<TokenAmount> {
        let amount = TokenAmount::from(amount);
        match self.action_type {
            ActionType::Erc1155Mint => Some(amount),
            _ => amount.scaled(config.decimals.unwrap_or(18)).ok(),
        }
    }
}

#[async_trait]
impl TipAction for MintAction {
    fn action_type(&self) -> &'static str {
        self.action_type.as_str()
    }

    async fn validate(&self, params: &TipParams) -> ValidationResult {
        let org = &params.org;
        let Some(config) = self.mint_config(org) else {
            return ValidationResult::invalid("Action not configured for this organization");
        };
        if config.deployment_status != DeploymentStatus::Deployed {
            return ValidationResult::invalid(
                "Tipping is still being set up for this workspace. Try again in a few minutes.",
            );
        }

        let recipient = self
            .store
            .get_user(&org.id, &params.to_user_id)
            .ok()
            .flatten();
        if recipient.is_none() {
            return ValidationResult::invalid(format!(
                "<@{}> is not registered. They need to run '/register <address>' first.",
                params.to_user_id
            ));
        }

        if params.amount < 0 {
            let poem = textgen::stealing_poem(self.textgen.as_ref()).await;
            return ValidationResult::invalid(
                poem.unwrap_or_else(|| "Nice try, but you can't steal tips!".to_string()),
            );
        }
        if params.amount == 0 {
            return ValidationResult::invalid("You can't tip 0, sorry!");
        }

        let remaining = self
            .store
            .get_user(&org.id, &params.from_user_id)
            .ok()
            .flatten()
            .map_or(0, |user| user.allowance);
        if remaining < params.amount {
            let refill = STAR.repeat(usize::try_from(org.daily_allowance).unwrap_or(0));
            return ValidationResult::invalid(format!(
                "Insufficient allowance, you only have {remaining} more tips left to give today. \
                 Every day at 9am CT your allowance will increase by {refill}."
            ));
        }

        ValidationResult::ok()
    }

    async fn execute(&self, params: &TipParams) -> TipResult {
        let org = &params.org;
        let Some(chain) = &self.chain else {
            tracing::error!(org = %org.id, "mint requested but no relay is configured");
            return TipResult::failed(TRANSACTION_FAILED);
        };
        let Some(config) = self.mint_config(org) else {
            return TipResult::failed("Action not configured for this organization");
        };
        let Some(slash_tip_address) = config.slash_tip_address.clone() else {
            return TipResult::failed("Missing contract configuration");
        };

        let Ok(amount) = u64::try_from(params.amount) else {
            return TipResult::failed(TRANSACTION_FAILED);
        };
        let Some(chain_amount) = self.chain_amount(config, amount) else {
            tracing::error!(org = %org.id, amount, "tip amount overflows when scaled");
            return TipResult::failed(TRANSACTION_FAILED);
        };

        let hash = match chain
            .mint(
                &slash_tip_address,
                &params.from_user_id,
                &params.to_user_id,
                chain_amount,
                params.message.as_deref(),
            )
            .await
        {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(org = %org.id, error = %e, "mint submission failed");
                return TipResult::failed(TRANSACTION_FAILED);
            }
        };

        tracing::info!(
            org = %org.id,
            from = %params.from_user_id,
            to = %params.to_user_id,
            amount,
            hash = ?hash,
            "minted tip"
        );

        // The allowance column is authoritative; a failed deduction is logged
        // but never claws back a submitted transaction.
        if let Err(e) = self
            .store
            .deduct_allowance(&org.id, &params.from_user_id, params.amount)
        {
            tracing::warn!(org = %org.id, user = %params.from_user_id, error = %e, "allowance deduction failed");
        }

        let annotation = params
            .message
            .as_deref()
            .map(|m| format!("({m})"))
            .unwrap_or_default();
        let mut blocks = vec![MessageBlock::section(format!(
            "+{} {annotation}\n<@{}> ->-> <@{}>",
            params.amount, params.from_user_id, params.to_user_id
        ))];

        // Self-tip easter egg.
        if params.from_user_id == params.to_user_id {
            if let Some(poem) = textgen::self_love_poem(self.textgen.as_ref()).await {
                blocks.push(MessageBlock::section(poem));
            }
        }

        TipResult::succeeded(hash, TipResponse::broadcast("").with_blocks(blocks))
    }
}
