//! Stage tools: listing, relabeling and reordering the columns of a board.

use std::collections::HashSet;

use dealdesk_domain::core::string::non_blank;
use dealdesk_domain::{Stage, Table, ToolError};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::args::{BoardInput, ReorderStagesInput, UpdateStageInput};
use super::gateway::row;
use super::guard::assert_stage_in_board;
use super::scope::TenantScope;

pub(crate) async fn list_stages(scope: &TenantScope, input: BoardInput) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let stages = scope.stages_of(&board.id).await?;
    let won_label = scope.won_stage_label();

    Ok(json!({
        "board": board.summary(),
        "stages": stages.iter().map(|s| s.summary(won_label)).collect::<Vec<_>>(),
    }))
}

pub(crate) async fn update_stage(scope: &TenantScope, input: UpdateStageInput) -> Result<Value, ToolError> {
    let stage: Stage = scope.assert_owned(&input.stage_id).await?;
    if let Some(board_id) = scope.ctx.board_id.as_deref() {
        assert_stage_in_board(&stage, board_id)?;
    }

    let mut patch = Map::new();
    if let Some(label) = input.label.as_deref() {
        let label = non_blank(Some(label)).ok_or_else(|| ToolError::validation("label must not be empty"))?;
        patch.insert("label".into(), json!(label));
    }
    if let Some(color) = non_blank(input.color.as_deref()) {
        patch.insert("color".into(), json!(color));
    }
    if patch.is_empty() {
        return Err(ToolError::validation("Nothing to update: pass label or color"));
    }

    let updated: Stage = scope
        .store
        .update_one(Table::BoardStages, scope.org(), &stage.id, patch)
        .await?;
    info!(tool = "updateStage", org = %scope.org(), stage = %updated.id, "Stage updated");

    Ok(json!({
        "stage": updated.summary(scope.won_stage_label()),
        "previousLabel": stage.label,
    }))
}

/// Problems with a proposed ordering, compared against the board's stage ids
fn ordering_problems(current: &[Stage], proposed: &[String]) -> Vec<String> {
    let known: HashSet<&str> = current.iter().map(|s| s.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut problems = Vec::new();

    for id in proposed {
        if !known.contains(id.as_str()) {
            problems.push(format!("'{}' is not a stage of this board", id));
        } else if !seen.insert(id.as_str()) {
            problems.push(format!("'{}' is listed more than once", id));
        }
    }
    for stage in current {
        if !seen.contains(stage.id.as_str()) {
            problems.push(format!("'{}' ({}) is missing", stage.id, stage.label));
        }
    }
    problems
}

/// Puts back the order of stages already rewritten by an interrupted reorder.
async fn restore_orders(scope: &TenantScope, applied: &[(&str, i64)]) {
    for (id, order) in applied.iter().rev() {
        if let Err(err) = scope
            .store
            .update_one::<Stage>(Table::BoardStages, scope.org(), id, row(json!({ "order": order })))
            .await
        {
            warn!(tool = "reorderStages", stage = %id, error = %err.message, "Could not restore stage order");
        }
    }
}

/// Rewrites stage `order` to the index of each id in `orderedStageIds`.
/// The list must name every stage of the board exactly once.
pub(crate) async fn reorder_stages(scope: &TenantScope, input: ReorderStagesInput) -> Result<Value, ToolError> {
    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let current = scope.stages_of(&board.id).await?;
    let proposed: Vec<String> = input
        .ordered_stage_ids
        .iter()
        .map(|id| id.trim().to_string())
        .collect();

    let problems = ordering_problems(&current, &proposed);
    if !problems.is_empty() {
        return Err(ToolError::validation(
            "orderedStageIds must list every stage of the board exactly once",
        )
        .with_details(json!({ "problems": problems })));
    }

    let mut applied: Vec<(&str, i64)> = Vec::new();
    for (index, id) in proposed.iter().enumerate() {
        let order = index as i64;
        let Some(previous) = current.iter().find(|s| &s.id == id).map(|s| s.order) else {
            continue;
        };
        if previous == order {
            continue;
        }
        if let Err(err) = scope
            .store
            .update_one::<Stage>(Table::BoardStages, scope.org(), id, row(json!({ "order": order })))
            .await
        {
            restore_orders(scope, &applied).await;
            return Err(err);
        }
        applied.push((id.as_str(), previous));
    }
    let updated = applied.len();
    info!(tool = "reorderStages", org = %scope.org(), board = %board.id, updated, "Stages reordered");

    let stages = scope.stages_of(&board.id).await?;
    Ok(json!({
        "board": board.summary(),
        "updated": updated,
        "stages": stages.iter().map(|s| s.summary(scope.won_stage_label())).collect::<Vec<_>>(),
    }))
}
