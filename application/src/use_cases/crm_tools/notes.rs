//! Deal notes (append-only).

use dealdesk_domain::{Note, Table, ToolError};
use serde_json::{Value, json};
use tracing::info;

use super::args::{AddDealNoteInput, ListDealNotesInput};
use super::gateway::row;
use super::scope::TenantScope;
use crate::ports::entity_store::Query;

pub(crate) async fn add_deal_note(scope: &TenantScope, input: AddDealNoteInput) -> Result<Value, ToolError> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(ToolError::validation("content must not be empty"));
    }
    let length = content.chars().count();
    if length > scope.config.max_note_length {
        return Err(ToolError::validation(format!(
            "content is too long ({} characters, at most {})",
            length, scope.config.max_note_length
        )));
    }
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;

    let note: Note = scope
        .store
        .insert(
            Table::DealNotes,
            row(json!({
                "organization_id": scope.org(),
                "deal_id": deal.id,
                "content": content,
                "created_by": scope.acting_user_id,
                "created_at": scope.now_value(),
            })),
        )
        .await?;
    info!(tool = "addDealNote", org = %scope.org(), deal = %deal.id, note = %note.id, "Note added");

    Ok(json!({ "note": note.summary(), "dealId": deal.id }))
}

pub(crate) async fn list_deal_notes(scope: &TenantScope, input: ListDealNotesInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;
    let limit = scope.config.list_limit(input.limit);

    let notes: Vec<Note> = scope
        .owned_where(
            Query::from(Table::DealNotes)
                .eq("deal_id", deal.id.as_str())
                .order_by("created_at", false)
                .limit(limit),
        )
        .await?;

    Ok(json!({
        "dealId": deal.id,
        "count": notes.len(),
        "notes": notes.iter().map(Note::summary).collect::<Vec<_>>(),
    }))
}
