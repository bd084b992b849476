//! Tenant guard.
//!
//! The only way handlers load rows. Every query carries
//! `organization_id = <calling organization>`, and a row that is missing is
//! reported exactly like a row that belongs to another tenant:
//!
//! ```text
//! { "ok": false, "error": "Deal not found", "code": "NOT_FOUND_OR_FORBIDDEN" }
//! ```
//!
//! Rows are re-checked after decoding so an adapter that ignores a filter
//! still cannot leak foreign data.

use dealdesk_domain::{Deal, ErrorCode, OwnedEntity, Stage, ToolError};
use tracing::debug;

use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

impl TenantScope {
    /// Load one entity by id within the calling organization.
    pub(crate) async fn assert_owned<E: OwnedEntity>(&self, id: &str) -> Result<E, ToolError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ToolError::not_found(E::KIND));
        }
        let query = Query::from(E::TABLE)
            .eq("id", id)
            .eq("organization_id", self.org())
            .limit(1);
        let found = self
            .store
            .fetch::<E>(&query)
            .await?
            .into_iter()
            .find(|e| e.id() == id && e.organization_id() == self.org());
        match found {
            Some(entity) => Ok(entity),
            None => {
                debug!(kind = E::KIND, "Guard rejected entity");
                Err(ToolError::not_found(E::KIND))
            }
        }
    }

    /// Like [`assert_owned`](Self::assert_owned), but a missing row is `None`.
    pub(crate) async fn find_owned<E: OwnedEntity>(&self, id: Option<&str>) -> Result<Option<E>, ToolError> {
        let Some(id) = id else {
            return Ok(None);
        };
        match self.assert_owned(id).await {
            Ok(entity) => Ok(Some(entity)),
            Err(err) if err.code == ErrorCode::NotFoundOrForbidden => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Load every entity of the calling organization matching `query`.
    pub(crate) async fn owned_where<E: OwnedEntity>(&self, query: Query) -> Result<Vec<E>, ToolError> {
        let query = query.filter(Filter::eq("organization_id", self.org()));
        let rows = self.store.fetch::<E>(&query).await?;
        Ok(rows
            .into_iter()
            .filter(|e| e.organization_id() == self.org())
            .collect())
    }
}

/// The deal must sit on `board_id`; otherwise it is reported as missing.
pub(crate) fn assert_deal_in_board(deal: &Deal, board_id: &str) -> Result<(), ToolError> {
    if deal.board_id == board_id {
        Ok(())
    } else {
        Err(ToolError::not_found(Deal::KIND))
    }
}

/// The stage must belong to `board_id`; otherwise it is reported as missing.
pub(crate) fn assert_stage_in_board(stage: &Stage, board_id: &str) -> Result<(), ToolError> {
    if stage.board_id == board_id {
        Ok(())
    } else {
        Err(ToolError::not_found(Stage::KIND))
    }
}
