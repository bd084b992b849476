//! Deal tools: search, details, stage moves, lifecycle and ownership.

use dealdesk_domain::core::string::non_blank;
use dealdesk_domain::{Activity, Contact, Deal, ErrorCode, Member, Note, Stage, Table, ToolError};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::args::{
    AssignDealInput, CreateDealInput, DealInput, ListDealsByStageInput, MarkLostInput,
    MarkWonInput, MoveDealInput, SearchInput, UpdateDealInput, parse_priority, parse_value,
};
use super::gateway::row;
use super::resolvers::find_stage;
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

fn stage_ref(stage: &Stage) -> Value {
    json!({ "id": stage.id, "label": stage.label })
}

fn open_deals(query: Query) -> Query {
    query
        .filter(Filter::neq("is_won", true))
        .filter(Filter::neq("is_lost", true))
}

pub(crate) async fn search_deals(scope: &TenantScope, input: SearchInput) -> Result<Value, ToolError> {
    let needle = non_blank(Some(&input.query))
        .ok_or_else(|| ToolError::validation("query must not be empty"))?;
    let limit = scope.config.list_limit(input.limit);
    let deals: Vec<Deal> = scope
        .owned_where(
            Query::from(Table::Deals)
                .filter(Filter::ilike("title", needle))
                .order_by("created_at", false)
                .limit(limit),
        )
        .await?;
    Ok(json!({
        "count": deals.len(),
        "deals": deals.iter().map(Deal::summary).collect::<Vec<_>>(),
    }))
}

pub(crate) async fn get_deal_details(scope: &TenantScope, input: DealInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;

    let stage: Option<Stage> = scope.find_owned(Some(&deal.stage_id)).await?;
    let contact: Option<Contact> = scope.find_owned(deal.contact_id.as_deref()).await?;
    let pending = scope
        .owned_where::<Activity>(
            Query::from(Table::Activities)
                .eq("deal_id", deal.id.as_str())
                .filter(Filter::neq("completed", true)),
        )
        .await?;
    let now = scope.now();
    let overdue = pending.iter().filter(|a| a.is_overdue(now)).count();
    let notes: Vec<Note> = scope
        .owned_where(Query::from(Table::DealNotes).eq("deal_id", deal.id.as_str()))
        .await?;

    let mut summary = deal.summary();
    if let Value::Object(map) = &mut summary {
        map.insert("description".into(), json!(deal.description));
        map.insert("lossReason".into(), json!(deal.loss_reason));
        map.insert("closedAt".into(), json!(deal.closed_at));
    }

    Ok(json!({
        "deal": summary,
        "stage": stage.as_ref().map(|s| s.summary(scope.won_stage_label())),
        "contact": contact.as_ref().map(Contact::summary),
        "pendingActivities": pending.len(),
        "overdueActivities": overdue,
        "notes": notes.len(),
    }))
}

pub(crate) async fn list_deals_by_stage(
    scope: &TenantScope,
    input: ListDealsByStageInput,
) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let stage = scope.resolve_stage(&board, &input.stage_name).await?;
    let deals: Vec<Deal> = scope
        .owned_where(open_deals(
            Query::from(Table::Deals)
                .eq("board_id", board.id.as_str())
                .eq("stage_id", stage.id.as_str())
                .order_by("created_at", false),
        ))
        .await?;
    let total = deals.len();
    let limit = scope.config.list_limit(input.limit);

    Ok(json!({
        "stage": stage_ref(&stage),
        "total": total,
        "deals": deals.iter().take(limit).map(Deal::summary).collect::<Vec<_>>(),
    }))
}

/// Moves an open deal to another stage of its own board.
///
/// The deal is resolved within the context board when the conversation has
/// one, and the target stage is always looked up on the deal's board, so a
/// stage id from another board is reported as not found.
pub(crate) async fn move_deal(scope: &TenantScope, input: MoveDealInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope
        .resolve_deal(&deal_id, scope.ctx.board_id.as_deref())
        .await?;
    deal.ensure_open()?;

    let stages = scope.stages_of(&deal.board_id).await?;
    let target = find_stage(&stages, &input.stage_name)?;
    let from = stages.iter().find(|s| s.id == deal.stage_id);

    if target.id == deal.stage_id {
        return Ok(json!({
            "deal": deal.summary(),
            "to": stage_ref(&target),
            "alreadyInStage": true,
        }));
    }

    let now = scope.now_value();
    let moved: Deal = scope
        .store
        .update_one(
            Table::Deals,
            scope.org(),
            &deal.id,
            row(json!({
                "stage_id": target.id,
                "last_stage_change_date": now,
                "updated_at": now,
            })),
        )
        .await?;
    info!(tool = "moveDeal", org = %scope.org(), deal = %moved.id, stage = %target.id, "Deal moved");

    Ok(json!({
        "deal": moved.summary(),
        "from": from.map(stage_ref),
        "to": stage_ref(&target),
        "alreadyInStage": false,
    }))
}

pub(crate) async fn create_deal(scope: &TenantScope, input: CreateDealInput) -> Result<Value, ToolError> {
    let title = non_blank(Some(&input.title))
        .ok_or_else(|| ToolError::validation("title must not be empty"))?;
    let value = input
        .value
        .map(|v| parse_value("value", v))
        .transpose()?
        .unwrap_or(0.0);
    let priority = parse_priority(input.priority.as_deref())?.unwrap_or_default();

    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let stage = match non_blank(input.stage_name.as_deref()) {
        Some(name) => scope.resolve_stage(&board, &name).await?,
        None => scope
            .stages_of(&board.id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::validation("The board has no stages"))?,
    };

    let (contact, contact_created) = match (
        non_blank(input.contact_id.as_deref()),
        non_blank(input.contact_name.as_deref()),
    ) {
        (Some(id), _) => (Some(scope.assert_owned::<Contact>(&id).await?), false),
        (None, Some(name)) => {
            let (contact, created) = scope.find_or_create_contact(&name).await?;
            (Some(contact), created)
        }
        (None, None) => (None, false),
    };

    let now = scope.now_value();
    let inserted = scope
        .store
        .insert::<Deal>(
            Table::Deals,
            row(json!({
                "organization_id": scope.org(),
                "board_id": board.id,
                "stage_id": stage.id,
                "title": title,
                "value": value,
                "priority": priority,
                "owner_id": scope.ctx.owner_id,
                "contact_id": contact.as_ref().map(|c| c.id.clone()),
                "is_won": false,
                "is_lost": false,
                "last_stage_change_date": now,
                "created_at": now,
                "updated_at": now,
            })),
        )
        .await;

    let deal = match inserted {
        Ok(deal) => deal,
        Err(err) => {
            if let Some(contact) = contact.as_ref().filter(|_| contact_created) {
                let filters = [
                    Filter::eq("id", contact.id.as_str()),
                    Filter::eq("organization_id", scope.org()),
                ];
                if let Err(cleanup) = scope.store.delete(Table::Contacts, &filters).await {
                    warn!(error = %cleanup, "Could not remove contact created for a failed deal");
                }
            }
            return Err(err);
        }
    };
    info!(tool = "createDeal", org = %scope.org(), deal = %deal.id, "Deal created");

    Ok(json!({
        "deal": deal.summary(),
        "stage": stage_ref(&stage),
        "contact": contact.as_ref().map(Contact::summary),
        "contactCreated": contact_created,
    }))
}

pub(crate) async fn update_deal(scope: &TenantScope, input: UpdateDealInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;

    let mut patch = Map::new();
    if let Some(title) = input.title.as_deref() {
        let title = non_blank(Some(title))
            .ok_or_else(|| ToolError::validation("title must not be empty"))?;
        patch.insert("title".into(), json!(title));
    }
    if let Some(value) = input.value {
        patch.insert("value".into(), json!(parse_value("value", value)?));
    }
    if let Some(priority) = parse_priority(input.priority.as_deref())? {
        patch.insert("priority".into(), json!(priority));
    }
    if let Some(description) = input.description {
        patch.insert("description".into(), json!(description.trim()));
    }
    if patch.is_empty() {
        return Err(ToolError::validation(
            "Nothing to update: pass title, value, priority or description",
        ));
    }
    let changed: Vec<String> = patch.keys().cloned().collect();
    patch.insert("updated_at".into(), scope.now_value());

    let updated: Deal = scope
        .store
        .update_one(Table::Deals, scope.org(), &deal.id, patch)
        .await?;
    info!(tool = "updateDeal", org = %scope.org(), deal = %updated.id, "Deal updated");

    Ok(json!({ "deal": updated.summary(), "updatedFields": changed }))
}

pub(crate) async fn mark_deal_as_won(scope: &TenantScope, input: MarkWonInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;
    deal.ensure_can_win()?;
    let won_value = input
        .won_value
        .map(|v| parse_value("wonValue", v))
        .transpose()?;

    if deal.is_won {
        return Ok(json!({ "deal": deal.summary(), "alreadyWon": true }));
    }

    let now = scope.now_value();
    let mut patch = row(json!({
        "is_won": true,
        "is_lost": false,
        "closed_at": now,
        "updated_at": now,
    }));
    if let Some(value) = won_value {
        patch.insert("value".into(), json!(value));
    }
    let won: Deal = scope
        .store
        .update_one(Table::Deals, scope.org(), &deal.id, patch)
        .await?;
    info!(tool = "markDealAsWon", org = %scope.org(), deal = %won.id, "Deal won");

    Ok(json!({ "deal": won.summary(), "alreadyWon": false }))
}

pub(crate) async fn mark_deal_as_lost(scope: &TenantScope, input: MarkLostInput) -> Result<Value, ToolError> {
    let reason = non_blank(Some(&input.reason))
        .ok_or_else(|| ToolError::validation("reason must not be empty"))?;
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;
    deal.ensure_can_lose()?;

    if deal.is_lost {
        return Ok(json!({ "deal": deal.summary(), "alreadyLost": true }));
    }

    let now = scope.now_value();
    let lost: Deal = scope
        .store
        .update_one(
            Table::Deals,
            scope.org(),
            &deal.id,
            row(json!({
                "is_lost": true,
                "is_won": false,
                "loss_reason": reason,
                "closed_at": now,
                "updated_at": now,
            })),
        )
        .await?;
    info!(tool = "markDealAsLost", org = %scope.org(), deal = %lost.id, "Deal lost");

    Ok(json!({ "deal": lost.summary(), "reason": reason, "alreadyLost": false }))
}

/// Reassigns a deal. The new owner must be a member of the calling
/// organization; an unknown or foreign user id is a validation error.
pub(crate) async fn assign_deal(scope: &TenantScope, input: AssignDealInput) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;
    let member: Member = scope
        .resolve_member(&input.new_owner_id)
        .await
        .map_err(|err| match err.code {
            ErrorCode::NotFoundOrForbidden => ToolError::validation(
                "newOwnerId is not a member of this organization",
            ),
            _ => err,
        })?;

    let assigned: Deal = scope
        .store
        .update_one(
            Table::Deals,
            scope.org(),
            &deal.id,
            row(json!({ "owner_id": member.id, "updated_at": scope.now_value() })),
        )
        .await?;
    info!(tool = "assignDeal", org = %scope.org(), deal = %assigned.id, owner = %member.id, "Deal reassigned");

    Ok(json!({
        "deal": assigned.summary(),
        "previousOwnerId": deal.owner_id,
        "owner": member.summary(),
    }))
}
