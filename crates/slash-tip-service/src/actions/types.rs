//! The tip action contract.
//!
//! Every `/tip` strategy implements [`TipAction`]. Validation failures and
//! execution failures are both ordinary responses destined for Slack, never
//! transport errors: whatever happens, the user gets a message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use slash_tip_core::Organization;

/// Input to a tip action.
#[derive(Debug, Clone)]
pub struct TipParams {
    /// The organization the tip happens in.
    pub org: Organization,

    /// Slack user id of the sender.
    pub from_user_id: String,

    /// Slack user id of the recipient.
    pub to_user_id: String,

    /// Tip amount as entered by the user. Signed: negative amounts are a
    /// stealing attempt and get a dedicated rejection.
    pub amount: i64,

    /// Optional message attached to the tip.
    pub message: Option<String>,
}

/// Outcome of validating a tip before execution.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the tip may be executed.
    pub valid: bool,

    /// User-facing rejection text when invalid.
    pub error: Option<String>,
}

impl ValidationResult {
    /// A passing validation.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// A failing validation with a user-facing message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Where a Slack response is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    /// Visible to the whole channel.
    #[serde(rename = "in_channel")]
    Broadcast,

    /// Visible only to the invoking user.
    #[serde(rename = "ephemeral")]
    Private,
}

/// One rich-text block in a Slack response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBlock {
    /// Markdown-ish text content.
    pub text: String,
}

impl MessageBlock {
    /// A plain section block.
    #[must_use]
    pub fn section(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The message a tip action sends back to Slack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipResponse {
    /// Broadcast or private.
    pub kind: ResponseKind,

    /// Simple text, when the response has no blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Rich blocks; takes precedence over `text` when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<MessageBlock>,
}

impl TipResponse {
    /// A channel-visible text response.
    #[must_use]
    pub fn broadcast(text: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Broadcast,
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }

    /// A sender-only text response.
    #[must_use]
    pub fn private(text: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Private,
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }

    /// Replace the text with rich blocks.
    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<MessageBlock>) -> Self {
        self.blocks = blocks;
        self.text = None;
        self
    }
}

/// Outcome of executing a tip action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipResult {
    /// Whether the tip went through.
    pub success: bool,

    /// Transaction hash, when one was observed in time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,

    /// The message to relay back to Slack.
    pub response: TipResponse,
}

impl TipResult {
    /// A successful result.
    #[must_use]
    pub fn succeeded(tx_hash: Option<String>, response: TipResponse) -> Self {
        Self {
            success: true,
            tx_hash,
            response,
        }
    }

    /// A failed result with a private explanation.
    #[must_use]
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            response: TipResponse::private(text),
        }
    }
}

/// A `/tip` fulfilment strategy.
///
/// `execute` does not return a `Result`: every failure mode maps to a
/// `TipResult` with `success: false` and a private message, so the handler
/// never has to translate errors into Slack text.
#[async_trait]
pub trait TipAction: Send + Sync {
    /// The action type string this strategy serves.
    fn action_type(&self) -> &'static str;

    /// Check the tip against org and user state.
    async fn validate(&self, params: &TipParams) -> ValidationResult;

    /// Perform the tip.
    async fn execute(&self, params: &TipParams) -> TipResult;
}

impl std::fmt::Debug for dyn TipAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipAction")
            .field("action_type", &self.action_type())
            .finish()
    }
}
