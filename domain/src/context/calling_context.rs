use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::core::string::non_blank;

/// Scoping data for one agent conversation.
///
/// `board_id` and `deal_id` are defaults for tools whose input omits them
/// (conversations are usually opened from a board or a deal page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingContext {
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    /// Default owner for entities created through the tools
    pub owner_id: String,
    /// Label of the board's "won" column, used to tag stages in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub won_stage_label: Option<String>,
}

impl CallingContext {
    pub fn new(organization_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            board_id: None,
            deal_id: None,
            owner_id: owner_id.into(),
            won_stage_label: None,
        }
    }

    pub fn with_board(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }

    pub fn with_deal(mut self, deal_id: impl Into<String>) -> Self {
        self.deal_id = Some(deal_id.into());
        self
    }

    pub fn with_won_stage_label(mut self, label: impl Into<String>) -> Self {
        self.won_stage_label = Some(label.into());
        self
    }

    /// Normalize and validate the context.
    ///
    /// Required ids are trimmed and must be non-empty; optional ids that are
    /// blank become `None`.
    pub fn validated(self) -> Result<Self, DomainError> {
        let organization_id = non_blank(Some(&self.organization_id))
            .ok_or_else(|| DomainError::InvalidContext("organizationId is empty".to_string()))?;
        let owner_id = non_blank(Some(&self.owner_id))
            .ok_or_else(|| DomainError::InvalidContext("ownerId is empty".to_string()))?;

        Ok(Self {
            organization_id,
            board_id: non_blank(self.board_id.as_deref()),
            deal_id: non_blank(self.deal_id.as_deref()),
            owner_id,
            won_stage_label: non_blank(self.won_stage_label.as_deref()),
        })
    }
}
