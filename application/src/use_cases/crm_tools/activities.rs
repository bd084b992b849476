//! Activity tools: tasks, logged interactions, completion and rescheduling.

use dealdesk_domain::core::string::non_blank;
use dealdesk_domain::{Activity, ActivityType, Deal, Table, ToolError};
use serde_json::{Value, json};
use tracing::info;

use super::args::{
    ActivityInput, CreateTaskInput, ListActivitiesInput, LogActivityInput,
    RescheduleActivityInput, parse_activity_type, parse_date,
};
use super::gateway::row;
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

/// Deal the activity hangs off, if any. An explicit id must be owned; the
/// context deal is used when none is passed.
async fn optional_deal(scope: &TenantScope, deal_id: Option<&str>) -> Result<Option<Deal>, ToolError> {
    match non_blank(deal_id).or_else(|| scope.ctx.deal_id.clone()) {
        Some(id) => Ok(Some(scope.resolve_deal(&id, None).await?)),
        None => Ok(None),
    }
}

fn required_title(title: &str) -> Result<String, ToolError> {
    non_blank(Some(title)).ok_or_else(|| ToolError::validation("title must not be empty"))
}

pub(crate) async fn create_task(scope: &TenantScope, input: CreateTaskInput) -> Result<Value, ToolError> {
    let title = required_title(&input.title)?;
    let due = parse_date("dueDate", &input.due_date)?;
    let activity_type = parse_activity_type(input.activity_type.as_deref(), ActivityType::Task)?;
    let deal = optional_deal(scope, input.deal_id.as_deref()).await?;

    let activity: Activity = scope
        .store
        .insert(
            Table::Activities,
            row(json!({
                "organization_id": scope.org(),
                "deal_id": deal.as_ref().map(|d| d.id.clone()),
                "owner_id": scope.ctx.owner_id,
                "title": title,
                "description": non_blank(input.description.as_deref()),
                "type": activity_type,
                "date": due,
                "completed": false,
                "created_at": scope.now_value(),
            })),
        )
        .await?;
    info!(tool = "createTask", org = %scope.org(), activity = %activity.id, "Task created");

    Ok(json!({ "activity": activity.summary() }))
}

pub(crate) async fn log_activity(scope: &TenantScope, input: LogActivityInput) -> Result<Value, ToolError> {
    let title = required_title(&input.title)?;
    let activity_type = parse_activity_type(input.activity_type.as_deref(), ActivityType::Call)?;
    let deal = optional_deal(scope, input.deal_id.as_deref()).await?;

    let now = scope.now_value();
    let activity: Activity = scope
        .store
        .insert(
            Table::Activities,
            row(json!({
                "organization_id": scope.org(),
                "deal_id": deal.as_ref().map(|d| d.id.clone()),
                "owner_id": scope.ctx.owner_id,
                "title": title,
                "description": non_blank(input.description.as_deref()),
                "type": activity_type,
                "date": now,
                "completed": true,
                "created_at": now,
            })),
        )
        .await?;
    info!(tool = "logActivity", org = %scope.org(), activity = %activity.id, "Activity logged");

    Ok(json!({ "activity": activity.summary() }))
}

/// Activities of one deal, else of the deals on a board, else of the whole
/// organization. Ordered by date.
pub(crate) async fn list_activities(
    scope: &TenantScope,
    input: ListActivitiesInput,
) -> Result<Value, ToolError> {
    let mut query = Query::from(Table::Activities).order_by("date", true);

    if let Some(deal_id) = non_blank(input.deal_id.as_deref()) {
        let deal = scope.resolve_deal(&deal_id, None).await?;
        query = query.eq("deal_id", deal.id.as_str());
    } else if non_blank(input.board_id.as_deref()).is_some() || scope.ctx.board_id.is_some() {
        let board = scope.resolve_board(input.board_id.as_deref()).await?;
        let deals: Vec<Deal> = scope
            .owned_where(Query::from(Table::Deals).eq("board_id", board.id.as_str()))
            .await?;
        query = query.filter(Filter::is_in("deal_id", deals.into_iter().map(|d| d.id)));
    }

    if let Some(completed) = input.completed {
        query = query.filter(if completed {
            Filter::eq("completed", true)
        } else {
            Filter::neq("completed", true)
        });
    }

    let activities: Vec<Activity> = scope.owned_where(query).await?;
    let limit = scope.config.list_limit(input.limit);
    let now = scope.now();

    Ok(json!({
        "total": activities.len(),
        "overdue": activities.iter().filter(|a| a.is_overdue(now)).count(),
        "activities": activities.iter().take(limit).map(Activity::summary).collect::<Vec<_>>(),
    }))
}

pub(crate) async fn complete_activity(scope: &TenantScope, input: ActivityInput) -> Result<Value, ToolError> {
    let activity: Activity = scope.assert_owned(&input.activity_id).await?;
    if activity.completed {
        return Ok(json!({ "activity": activity.summary(), "alreadyCompleted": true }));
    }

    let done: Activity = scope
        .store
        .update_one(
            Table::Activities,
            scope.org(),
            &activity.id,
            row(json!({ "completed": true })),
        )
        .await?;
    info!(tool = "completeActivity", org = %scope.org(), activity = %done.id, "Activity completed");

    Ok(json!({ "activity": done.summary(), "alreadyCompleted": false }))
}

pub(crate) async fn reschedule_activity(
    scope: &TenantScope,
    input: RescheduleActivityInput,
) -> Result<Value, ToolError> {
    let new_date = parse_date("newDate", &input.new_date)?;
    let activity: Activity = scope.assert_owned(&input.activity_id).await?;
    if activity.completed {
        return Err(ToolError::validation(
            "Completed activities cannot be rescheduled",
        ));
    }

    let moved: Activity = scope
        .store
        .update_one(
            Table::Activities,
            scope.org(),
            &activity.id,
            row(json!({ "date": new_date })),
        )
        .await?;
    info!(tool = "rescheduleActivity", org = %scope.org(), activity = %moved.id, "Activity rescheduled");

    Ok(json!({
        "activity": moved.summary(),
        "previousDate": activity.date,
    }))
}
