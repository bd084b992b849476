//! Per-toolset state every handler runs against.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dealdesk_domain::{CallingContext, ToolError};
use serde_json::{Value, json};

use super::gateway::StoreGateway;
use crate::config::ToolsConfig;
use crate::ports::clock::Clock;

/// The validated calling context plus the collaborators it was bound to.
///
/// Immutable once built; a toolset never carries state across calls.
pub(crate) struct TenantScope {
    pub(crate) ctx: CallingContext,
    pub(crate) acting_user_id: String,
    pub(crate) store: StoreGateway,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: ToolsConfig,
}

impl TenantScope {
    pub(crate) fn org(&self) -> &str {
        &self.ctx.organization_id
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// `now` as a store timestamp value
    pub(crate) fn now_value(&self) -> Value {
        json!(self.now())
    }

    /// Deal id from the input, else the context's current deal
    pub(crate) fn deal_id_or_context(&self, input: Option<&str>) -> Result<String, ToolError> {
        dealdesk_domain::core::string::non_blank(input)
            .or_else(|| self.ctx.deal_id.clone())
            .ok_or_else(|| ToolError::validation("dealId is required"))
    }

    /// Board id/key from the input, else the context's current board
    pub(crate) fn board_ref_or_context(&self, input: Option<&str>) -> Result<String, ToolError> {
        dealdesk_domain::core::string::non_blank(input)
            .or_else(|| self.ctx.board_id.clone())
            .ok_or_else(|| ToolError::validation("boardId is required"))
    }

    pub(crate) fn won_stage_label(&self) -> Option<&str> {
        self.ctx.won_stage_label.as_deref()
    }
}
