//! Read-only pipeline analytics over one board.
//!
//! All aggregations are computed in memory from guarded reads; "now" comes
//! from the injected clock so results are reproducible in tests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dealdesk_domain::{Activity, Deal, Table, ToolError};
use serde_json::{Value, json};

use super::args::{BoardInput, BoardListInput, ListStagnantDealsInput};
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

/// Overdue count and oldest due date per deal
type OverdueIndex = HashMap<String, (usize, DateTime<Utc>)>;

async fn board_deals(scope: &TenantScope, board_id: &str) -> Result<Vec<Deal>, ToolError> {
    scope
        .owned_where(Query::from(Table::Deals).eq("board_id", board_id))
        .await
}

async fn overdue_index(scope: &TenantScope, open: &[&Deal]) -> Result<OverdueIndex, ToolError> {
    if open.is_empty() {
        return Ok(OverdueIndex::new());
    }
    let activities: Vec<Activity> = scope
        .owned_where(
            Query::from(Table::Activities)
                .filter(Filter::is_in("deal_id", open.iter().map(|d| d.id.as_str())))
                .filter(Filter::neq("completed", true))
                .filter(Filter::lt("date", scope.now_value())),
        )
        .await?;

    let now = scope.now();
    let mut index = OverdueIndex::new();
    for activity in activities.iter().filter(|a| a.is_overdue(now)) {
        let Some(deal_id) = activity.deal_id.clone() else {
            continue;
        };
        let entry = index.entry(deal_id).or_insert((0, activity.date));
        entry.0 += 1;
        entry.1 = entry.1.min(activity.date);
    }
    Ok(index)
}

fn sum_values<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> f64 {
    deals.into_iter().map(|d| d.value).sum()
}

/// Won share of closed deals, `None` while nothing is closed
fn win_rate(won: usize, lost: usize) -> Option<f64> {
    let closed = won + lost;
    (closed > 0).then(|| (won as f64 / closed as f64 * 1000.0).round() / 1000.0)
}

/// `now` minus `days`, `None` when the date falls outside chrono's range
fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|delta| now.checked_sub_signed(delta))
}

fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

pub(crate) async fn analyze_pipeline(scope: &TenantScope, input: BoardInput) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let stages = scope.stages_of(&board.id).await?;
    let deals = board_deals(scope, &board.id).await?;
    let won_label = scope.won_stage_label();

    let stage_rows: Vec<Value> = stages
        .iter()
        .map(|stage| {
            let open: Vec<&Deal> = deals
                .iter()
                .filter(|d| d.is_open() && d.stage_id == stage.id)
                .collect();
            json!({
                "id": stage.id,
                "label": stage.label,
                "lifecycle": stage.lifecycle(won_label).map(|l| l.as_str()),
                "openDeals": open.len(),
                "openValue": sum_values(open.iter().copied()),
            })
        })
        .collect();

    let won: Vec<&Deal> = deals.iter().filter(|d| d.is_won).collect();
    let lost: Vec<&Deal> = deals.iter().filter(|d| d.is_lost).collect();

    Ok(json!({
        "board": board.summary(),
        "stages": stage_rows,
        "won": { "count": won.len(), "value": sum_values(won.iter().copied()) },
        "lost": { "count": lost.len(), "value": sum_values(lost.iter().copied()) },
        "winRate": win_rate(won.len(), lost.len()),
    }))
}

pub(crate) async fn get_board_metrics(scope: &TenantScope, input: BoardInput) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let deals = board_deals(scope, &board.id).await?;

    let open: Vec<&Deal> = deals.iter().filter(|d| d.is_open()).collect();
    let won: Vec<&Deal> = deals.iter().filter(|d| d.is_won).collect();
    let lost = deals.iter().filter(|d| d.is_lost).count();

    let pipeline_value = sum_values(open.iter().copied());
    let average_open_value = if open.is_empty() {
        0.0
    } else {
        pipeline_value / open.len() as f64
    };
    let cutoff = days_before(scope.now(), scope.config.default_stagnant_days)
        .ok_or_else(|| ToolError::validation("The configured stagnant threshold is too large"))?;
    let stagnant = open.iter().filter(|d| d.is_stagnant_since(cutoff)).count();
    let overdue = overdue_index(scope, &open).await?;

    Ok(json!({
        "board": board.summary(),
        "totalDeals": deals.len(),
        "openDeals": open.len(),
        "wonDeals": won.len(),
        "lostDeals": lost,
        "pipelineValue": pipeline_value,
        "wonValue": sum_values(won.iter().copied()),
        "averageOpenValue": average_open_value,
        "winRate": win_rate(won.len(), lost),
        "stagnantDeals": stagnant,
        "stagnantThresholdDays": scope.config.default_stagnant_days,
        "overdueDeals": overdue.len(),
    }))
}

/// Open deals whose stage has not changed for `daysStagnant` days, oldest
/// first.
pub(crate) async fn list_stagnant_deals(
    scope: &TenantScope,
    input: ListStagnantDealsInput,
) -> Result<Value, ToolError> {
    let days = input.days_stagnant.unwrap_or(scope.config.default_stagnant_days);
    if days < 1 {
        return Err(ToolError::validation("daysStagnant must be at least 1"));
    }
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let now = scope.now();
    let cutoff =
        days_before(now, days).ok_or_else(|| ToolError::validation("daysStagnant is too large"))?;

    let mut stagnant: Vec<(Deal, DateTime<Utc>)> = board_deals(scope, &board.id)
        .await?
        .into_iter()
        .filter(|d| d.is_stagnant_since(cutoff))
        .filter_map(|d| d.stage_changed_at().map(|changed| (d, changed)))
        .collect();
    stagnant.sort_by_key(|(_, changed)| *changed);

    let total = stagnant.len();
    let limit = scope.config.list_limit(input.limit);
    let deals: Vec<Value> = stagnant
        .iter()
        .take(limit)
        .map(|(deal, changed)| {
            let mut summary = deal.summary();
            if let Value::Object(map) = &mut summary {
                map.insert("daysInStage".into(), json!(days_between(*changed, now)));
            }
            summary
        })
        .collect();

    Ok(json!({
        "board": board.summary(),
        "daysStagnant": days,
        "total": total,
        "deals": deals,
    }))
}

/// Open deals with at least one pending activity dated in the past, most
/// overdue first.
pub(crate) async fn list_overdue_deals(scope: &TenantScope, input: BoardListInput) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let deals = board_deals(scope, &board.id).await?;
    let open: Vec<&Deal> = deals.iter().filter(|d| d.is_open()).collect();
    let index = overdue_index(scope, &open).await?;

    let mut overdue: Vec<(&Deal, usize, DateTime<Utc>)> = open
        .into_iter()
        .filter_map(|d| index.get(&d.id).map(|(count, oldest)| (d, *count, *oldest)))
        .collect();
    overdue.sort_by_key(|(_, _, oldest)| *oldest);

    let now = scope.now();
    let total = overdue.len();
    let limit = scope.config.list_limit(input.limit);
    let deals: Vec<Value> = overdue
        .iter()
        .take(limit)
        .map(|(deal, count, oldest)| {
            let mut summary = deal.summary();
            if let Value::Object(map) = &mut summary {
                map.insert("overdueActivities".into(), json!(count));
                map.insert("oldestDueDate".into(), json!(oldest));
                map.insert("daysOverdue".into(), json!(days_between(*oldest, now)));
            }
            summary
        })
        .collect();

    Ok(json!({ "board": board.summary(), "total": total, "deals": deals }))
}
