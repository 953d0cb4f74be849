//! Organization (Slack workspace tenant) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionConfig, ActionType};
use crate::error::TipError;
use crate::ids::OrgId;

/// Default number of tips a user may give per day.
pub const DEFAULT_DAILY_ALLOWANCE: i64 = 3;

/// A Slack workspace's tenant record.
///
/// Created at install time; the action type and config are filled in when an
/// admin completes setup, and updated when contracts are redeployed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id.
    pub id: OrgId,

    /// URL-safe unique slug.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Slack team id (unique).
    pub slack_team_id: String,

    /// Slack bot token for this workspace.
    pub slack_bot_token: String,

    /// Slack user id of the installing admin, once known.
    pub admin_user_id: Option<String>,

    /// Tips each user may give per day.
    pub daily_allowance: i64,

    /// Configured action type, if setup has completed.
    pub action_type: Option<ActionType>,

    /// Action config blob; shape always matches `action_type`.
    pub action_config: Option<ActionConfig>,

    /// When the org paid, if ever.
    pub paid_at: Option<DateTime<Utc>>,

    /// When the org was created.
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization with no action configured.
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        slack_team_id: impl Into<String>,
        slack_bot_token: impl Into<String>,
    ) -> Self {
        Self {
            id: OrgId::generate(),
            slug: slug.into(),
            name: name.into(),
            slack_team_id: slack_team_id.into(),
            slack_bot_token: slack_bot_token.into(),
            admin_user_id: None,
            daily_allowance: DEFAULT_DAILY_ALLOWANCE,
            action_type: None,
            action_config: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    /// Set the action type and config together, enforcing that the config
    /// blob's shape matches the type.
    ///
    /// A `None` config is allowed (setup not finished); a config without a
    /// type is not.
    ///
    /// # Errors
    ///
    /// Returns `TipError::ActionConfigMismatch` if the shapes disagree.
    pub fn set_action(
        &mut self,
        action_type: ActionType,
        config: Option<ActionConfig>,
    ) -> Result<(), TipError> {
        if let Some(config) = &config {
            if config.action_type() != action_type {
                return Err(TipError::ActionConfigMismatch {
                    expected: action_type.to_string(),
                    config: config.action_type().to_string(),
                });
            }
        }
        self.action_type = Some(action_type);
        self.action_config = config;
        Ok(())
    }

    /// Clear the action type and config together.
    pub fn clear_action(&mut self) {
        self.action_type = None;
        self.action_config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MintConfig, PoemConfig};

    fn test_org() -> Organization {
        Organization::new("acme", "Acme Inc", "T0123", "xoxb-test")
    }

    #[test]
    fn new_org_has_no_action_and_default_allowance() {
        let org = test_org();
        assert!(org.action_type.is_none());
        assert!(org.action_config.is_none());
        assert_eq!(org.daily_allowance, DEFAULT_DAILY_ALLOWANCE);
    }

    #[test]
    fn set_action_accepts_matching_config() {
        let mut org = test_org();
        org.set_action(
            ActionType::Erc1155Mint,
            Some(ActionConfig::Erc1155Mint(MintConfig::default())),
        )
        .unwrap();
        assert_eq!(org.action_type, Some(ActionType::Erc1155Mint));
    }

    #[test]
    fn set_action_rejects_mismatched_config() {
        let mut org = test_org();
        let err = org
            .set_action(
                ActionType::Erc20Mint,
                Some(ActionConfig::Poem(PoemConfig::default())),
            )
            .unwrap_err();
        assert!(matches!(err, TipError::ActionConfigMismatch { .. }));
        // The org must be left untouched.
        assert!(org.action_type.is_none());
    }

    #[test]
    fn set_action_allows_missing_config() {
        let mut org = test_org();
        org.set_action(ActionType::Poem, None).unwrap();
        assert_eq!(org.action_type, Some(ActionType::Poem));
        assert!(org.action_config.is_none());
    }
}
