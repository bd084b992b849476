//! Entity resolvers.
//!
//! Turn loose identifiers coming from the model into canonical rows of the
//! calling organization. Each resolver is a fixed sequence of exact checks
//! (documented per function); there is no scoring.

use dealdesk_domain::core::string::normalize_label;
use dealdesk_domain::crm::email::normalize_email;
use dealdesk_domain::crm::matching::{match_label_then_id, match_name_exact_then_partial};
use dealdesk_domain::crm::phone::normalize_phone_e164;
use dealdesk_domain::{
    Board, Company, Contact, Deal, ErrorCode, Member, Stage, Table, ToolError,
};
use serde_json::json;
use tracing::debug;

use super::gateway::row;
use super::guard::assert_deal_in_board;
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

impl TenantScope {
    /// Board by id, then by human key (case-insensitive). Falls back to the
    /// context board when no reference is given.
    pub(crate) async fn resolve_board(&self, board_ref: Option<&str>) -> Result<Board, ToolError> {
        let wanted = self.board_ref_or_context(board_ref)?;
        let boards: Vec<Board> = self
            .owned_where(Query::from(Table::Boards).order_by("created_at", true))
            .await?;

        if let Some(board) = boards.iter().find(|b| b.id == wanted) {
            return Ok(board.clone());
        }
        let key = normalize_label(&wanted);
        boards
            .into_iter()
            .find(|b| b.key.as_deref().map(normalize_label).as_deref() == Some(key.as_str()))
            .ok_or_else(|| ToolError::not_found("Board"))
    }

    /// Stages of a board ordered by `order`
    pub(crate) async fn stages_of(&self, board_id: &str) -> Result<Vec<Stage>, ToolError> {
        self.owned_where(
            Query::from(Table::BoardStages)
                .eq("board_id", board_id)
                .order_by("order", true),
        )
        .await
    }

    /// Stage of `board` by label (case-insensitive, first by order on
    /// duplicates), then by id.
    pub(crate) async fn resolve_stage(&self, board: &Board, stage_ref: &str) -> Result<Stage, ToolError> {
        let stages = self.stages_of(&board.id).await?;
        find_stage(&stages, stage_ref)
    }

    /// Deal of the calling organization; when `board_id` is given the deal
    /// must sit on that board.
    pub(crate) async fn resolve_deal(&self, deal_id: &str, board_id: Option<&str>) -> Result<Deal, ToolError> {
        let deal: Deal = self.assert_owned(deal_id).await?;
        if let Some(board_id) = board_id {
            assert_deal_in_board(&deal, board_id)?;
        }
        Ok(deal)
    }

    /// Contact by id, then exact email (case-insensitive), then phone after
    /// E.164 normalization. Oldest match wins.
    pub(crate) async fn resolve_contact(&self, identifier: &str) -> Result<Contact, ToolError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ToolError::not_found("Contact"));
        }
        let by_created = |q: Query| q.order_by("created_at", true);

        let by_id: Vec<Contact> = self
            .owned_where(by_created(Query::from(Table::Contacts).eq("id", identifier)))
            .await?;
        if let Some(contact) = by_id.into_iter().next() {
            return Ok(contact);
        }

        if identifier.contains('@') {
            let email = normalize_email(identifier);
            let candidates: Vec<Contact> = self
                .owned_where(by_created(
                    Query::from(Table::Contacts).filter(Filter::ilike("email", email.as_str())),
                ))
                .await?;
            if let Some(contact) = candidates
                .into_iter()
                .find(|c| c.email.as_deref().map(normalize_email) == Some(email.clone()))
            {
                return Ok(contact);
            }
            return Err(ToolError::not_found("Contact"));
        }

        let phone = normalize_phone_e164(identifier, &self.config.default_country_code);
        if phone.starts_with('+') {
            let candidates: Vec<Contact> = self
                .owned_where(by_created(Query::from(Table::Contacts).eq("phone", phone.as_str())))
                .await?;
            if let Some(contact) = candidates.into_iter().next() {
                return Ok(contact);
            }
        }
        Err(ToolError::not_found("Contact"))
    }

    /// Member (user profile) of the calling organization
    pub(crate) async fn resolve_member(&self, user_id: &str) -> Result<Member, ToolError> {
        self.assert_owned(user_id).await
    }

    /// Contact by exact name, then by partial name; otherwise a new contact
    /// owned by the context owner. Returns whether it was created.
    pub(crate) async fn find_or_create_contact(&self, name: &str) -> Result<(Contact, bool), ToolError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ToolError::validation("contactName must not be empty"));
        }
        let candidates: Vec<Contact> = self
            .owned_where(
                Query::from(Table::Contacts)
                    .filter(Filter::ilike("name", name))
                    .order_by("created_at", true),
            )
            .await?;
        if let Some((contact, matched_by)) =
            match_name_exact_then_partial(&candidates, name, |c| c.name.as_str())
        {
            debug!(?matched_by, "Matched existing contact");
            return Ok((contact.clone(), false));
        }

        let now = self.now_value();
        let contact: Contact = self
            .store
            .insert(
                Table::Contacts,
                row(json!({
                    "organization_id": self.org(),
                    "name": name,
                    "owner_id": self.ctx.owner_id,
                    "created_at": now,
                    "updated_at": now,
                })),
            )
            .await?;
        Ok((contact, true))
    }

    /// Company by exact name (case-insensitive); otherwise a new company.
    pub(crate) async fn find_or_create_company(&self, name: &str) -> Result<Company, ToolError> {
        let name = name.trim();
        let wanted = normalize_label(name);
        let candidates: Vec<Company> = self
            .owned_where(Query::from(Table::Companies).filter(Filter::ilike("name", name)))
            .await?;
        if let Some(company) = candidates
            .into_iter()
            .find(|c| normalize_label(&c.name) == wanted)
        {
            return Ok(company);
        }
        self.store
            .insert(
                Table::Companies,
                row(json!({
                    "organization_id": self.org(),
                    "name": name,
                    "created_at": self.now_value(),
                })),
            )
            .await
    }
}

/// Pure stage lookup over an ordered stage list
pub(crate) fn find_stage(stages: &[Stage], stage_ref: &str) -> Result<Stage, ToolError> {
    match match_label_then_id(stages, stage_ref, |s| s.label.as_str(), |s| s.id.as_str()) {
        Some((stage, _)) => Ok(stage.clone()),
        None => {
            let labels: Vec<&str> = stages.iter().map(|s| s.label.as_str()).collect();
            Err(ToolError::new(
                ErrorCode::NotFoundOrForbidden,
                format!(
                    "Stage '{}' not found on this board. Available stages: {}",
                    stage_ref.trim(),
                    labels.join(", ")
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ctx_a, seed, toolset};
    use dealdesk_domain::CallingContext;

    #[tokio::test]
    async fn test_resolve_board_by_id_key_and_context() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();

        assert_eq!(scope.resolve_board(Some("board-a2")).await.unwrap().id, "board-a2");
        assert_eq!(scope.resolve_board(Some("SALES")).await.unwrap().id, "board-a");
        assert_eq!(scope.resolve_board(None).await.unwrap().id, "board-a");
    }

    #[tokio::test]
    async fn test_resolve_board_never_crosses_tenant() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let err = tools.scope().resolve_board(Some("board-b")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFoundOrForbidden);
    }

    #[tokio::test]
    async fn test_resolve_board_requires_some_reference() {
        let store = seed();
        let tools = toolset(&store, CallingContext::new("org-a", "user-a1"));
        let err = tools.scope().resolve_board(None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "boardId is required");
    }

    #[tokio::test]
    async fn test_resolve_stage_label_then_id() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();
        let board = scope.resolve_board(None).await.unwrap();

        assert_eq!(scope.resolve_stage(&board, " proposta ").await.unwrap().id, "st-a-prop");
        assert_eq!(scope.resolve_stage(&board, "st-a-ganho").await.unwrap().label, "Ganho");

        let err = scope.resolve_stage(&board, "st-b-prop").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFoundOrForbidden);
        assert!(err.message.contains("Novo, Proposta, Ganho, Perdido"));
    }

    #[tokio::test]
    async fn test_resolve_deal_board_scope() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();

        assert!(scope.resolve_deal("deal-a5", None).await.is_ok());
        let err = scope.resolve_deal("deal-a5", Some("board-a")).await.unwrap_err();
        assert_eq!(err.message, "Deal not found");
    }

    #[tokio::test]
    async fn test_resolve_contact_by_id_email_and_phone() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();

        assert_eq!(scope.resolve_contact("contact-a1").await.unwrap().id, "contact-a1");
        assert_eq!(scope.resolve_contact("MARIA@acme.com").await.unwrap().id, "contact-a1");
        assert_eq!(scope.resolve_contact("(11) 98765-4321").await.unwrap().id, "contact-a1");
        assert!(scope.resolve_contact("joao@globex.com").await.is_err());
        assert!(scope.resolve_contact("contact-b1").await.is_err());
    }

    #[tokio::test]
    async fn test_find_or_create_contact() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();

        let (found, created) = scope.find_or_create_contact("maria").await.unwrap();
        assert_eq!(found.id, "contact-a1");
        assert!(!created);

        let (new, created) = scope.find_or_create_contact("Pedro Alves").await.unwrap();
        assert!(created);
        assert_eq!(new.organization_id, "org-a");
        assert_eq!(new.owner_id.as_deref(), Some("user-a1"));
    }

    #[tokio::test]
    async fn test_find_or_create_company_is_exact() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let scope = tools.scope();

        assert_eq!(scope.find_or_create_company(" acme ").await.unwrap().id, "co-a1");
        let other = scope.find_or_create_company("Acme Labs").await.unwrap();
        assert_ne!(other.id, "co-a1");
        assert_eq!(store.rows(Table::Companies).len(), 2);
    }
}
