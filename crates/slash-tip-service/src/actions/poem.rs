//! Poem tip action: no value moves, the recipient gets verse.

use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::types::{MessageBlock, TipAction, TipParams, TipResponse, TipResult, ValidationResult};
use crate::textgen::{self, TextGenerator};

/// Fallback verse when generation is unavailable.
const FALLBACK_POEM: &str = "A tip travels far,\nkind words worth more than tokens.\nThank you, teammate, thanks.";

/// Tip action that generates a poem for the recipient.
pub struct PoemAction {
    textgen: Arc<dyn TextGenerator>,
}

impl PoemAction {
    /// Create the poem action.
    #[must_use]
    pub fn new(textgen: Arc<dyn TextGenerator>) -> Self {
        Self { textgen }
    }
}

#[async_trait]
impl TipAction for PoemAction {
    fn action_type(&self) -> &'static str {
        "poem"
    }

    async fn validate(&self, _params: &TipParams) -> ValidationResult {
        // Anyone can receive a poem.
        ValidationResult::ok()
    }

    async fn execute(&self, params: &TipParams) -> TipResult {
        let style = params
            .org
            .action_config
            .as_ref()
            .and_then(|c| c.as_poem())
            .and_then(|c| c.style);

        let poem = textgen::tip_poem(
            self.textgen.as_ref(),
            style,
            &params.from_user_id,
            &params.to_user_id,
            params.message.as_deref(),
        )
        .await
        .unwrap_or_else(|| FALLBACK_POEM.to_string());

        let blocks = vec![
            MessageBlock::section(format!(
                "<@{}> wrote a poem for <@{}>:",
                params.from_user_id, params.to_user_id
            )),
            MessageBlock::section(format!("_{poem}_")),
        ];

        TipResult::succeeded(None, TipResponse::broadcast("").with_blocks(blocks))
    }
}
