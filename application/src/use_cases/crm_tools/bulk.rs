//! Bulk stage moves.
//!
//! `moveDealsBulk` resolves the board and target stage once, then classifies
//! every requested deal before writing anything:
//!
//! ```text
//! dealIds ──cap check──▶ dedupe ──▶ plan (move | unchanged | skip)
//!                                      │
//!            allowPartial = false ─────┼──▶ any skip? VALIDATION_ERROR, no writes
//!            allowPartial = true  ─────┴──▶ commit moves, skips reported as PARTIAL_FAILURE
//! ```
//!
//! A store failure while committing stops the batch; the error lists the
//! deals that were already moved.

use std::collections::HashSet;

use dealdesk_domain::{Deal, Stage, Table, ToolError};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::args::MoveDealsBulkInput;
use super::gateway::row;
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

#[derive(Debug, Clone, PartialEq)]
enum Plan {
    Move,
    Unchanged,
    Skip(String),
}

#[derive(Debug)]
struct Item {
    deal_id: String,
    plan: Plan,
}

impl Item {
    fn to_json(&self, status: &str) -> Value {
        match &self.plan {
            Plan::Skip(reason) => json!({ "dealId": self.deal_id, "status": status, "reason": reason }),
            _ => json!({ "dealId": self.deal_id, "status": status }),
        }
    }
}

/// Trimmed ids in first-seen order, blanks dropped
fn dedupe(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

fn plan_items(ids: &[String], deals: &[Deal], target: &Stage) -> Vec<Item> {
    ids.iter()
        .map(|id| {
            let plan = match deals.iter().find(|d| &d.id == id) {
                None => Plan::Skip(ToolError::not_found("Deal").message),
                Some(deal) => match deal.ensure_open() {
                    Err(err) => Plan::Skip(err.to_string()),
                    Ok(()) if deal.stage_id == target.id => Plan::Unchanged,
                    Ok(()) => Plan::Move,
                },
            };
            Item {
                deal_id: id.clone(),
                plan,
            }
        })
        .collect()
}

pub(crate) async fn move_deals_bulk(scope: &TenantScope, input: MoveDealsBulkInput) -> Result<Value, ToolError> {
    let cap = scope.config.bulk_cap(input.max_deals);
    if input.deal_ids.len() > cap {
        return Err(ToolError::validation(format!(
            "Too many deals: {} requested, at most {} per call",
            input.deal_ids.len(),
            cap
        )));
    }
    let ids = dedupe(&input.deal_ids);
    if ids.is_empty() {
        return Err(ToolError::validation("dealIds must contain at least one deal id"));
    }

    let board = scope.resolve_board(input.board_id.as_deref()).await?;
    let target = scope.resolve_stage(&board, &input.stage_name).await?;
    let deals: Vec<Deal> = scope
        .owned_where(
            Query::from(Table::Deals)
                .filter(Filter::is_in("id", ids.iter().map(String::as_str)))
                .eq("board_id", board.id.as_str()),
        )
        .await?;
    let items = plan_items(&ids, &deals, &target);

    let skipped: Vec<&Item> = items
        .iter()
        .filter(|i| matches!(i.plan, Plan::Skip(_)))
        .collect();
    if !input.allow_partial && !skipped.is_empty() {
        return Err(ToolError::validation(format!(
            "{} of {} deals cannot be moved; nothing was changed",
            skipped.len(),
            items.len()
        ))
        .with_details(json!({
            "failed": skipped.iter().map(|i| i.to_json("skipped")).collect::<Vec<_>>(),
        })));
    }

    let now = scope.now_value();
    let mut moved: Vec<String> = Vec::new();
    let mut results = Vec::with_capacity(items.len());
    for item in &items {
        match &item.plan {
            Plan::Move => {
                let written = scope
                    .store
                    .update_one::<Deal>(
                        Table::Deals,
                        scope.org(),
                        &item.deal_id,
                        row(json!({
                            "stage_id": target.id,
                            "last_stage_change_date": now,
                            "updated_at": now,
                        })),
                    )
                    .await;
                if let Err(err) = written {
                    warn!(tool = "moveDealsBulk", org = %scope.org(), moved = moved.len(), "Bulk move interrupted");
                    return Err(ToolError::api(format!(
                        "{}. {} deal(s) were moved before the failure",
                        err.message.trim_end_matches('.'),
                        moved.len()
                    ))
                    .with_details(json!({ "moved": moved, "failedAt": item.deal_id })));
                }
                moved.push(item.deal_id.clone());
                results.push(item.to_json("moved"));
            }
            Plan::Unchanged => results.push(item.to_json("unchanged")),
            Plan::Skip(_) => results.push(item.to_json("skipped")),
        }
    }
    info!(
        tool = "moveDealsBulk",
        org = %scope.org(),
        stage = %target.id,
        moved = moved.len(),
        skipped = skipped.len(),
        "Bulk move finished"
    );

    let unchanged = items.len() - moved.len() - skipped.len();
    let data = json!({
        "stage": { "id": target.id, "label": target.label },
        "moved": moved.len(),
        "unchanged": unchanged,
        "skipped": skipped.len(),
        "results": results,
    });
    if skipped.is_empty() {
        Ok(data)
    } else {
        Err(ToolError::partial_failure(format!(
            "{} of {} deals skipped",
            skipped.len(),
            items.len()
        ))
        .with_details(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::ports::entity_store::StoreError;
    use crate::testing::{ctx_a, seed, toolset, toolset_with};
    use dealdesk_domain::ErrorCode;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let ids = vec![" a ".to_string(), "b".to_string(), "a".to_string(), "".to_string()];
        assert_eq!(dedupe(&ids), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_strict_mode_moves_everything_or_nothing() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ["deal-a1", "deal-a3", "deal-b1"], "stageName": "Proposta" }),
            )
            .await;
        assert_eq!(result.error_code(), Some(ErrorCode::ValidationError));
        let failed = result.data().unwrap()["failed"].as_array().unwrap().clone();
        let ids: Vec<&str> = failed.iter().map(|f| f["dealId"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["deal-a3", "deal-b1"]);
        assert_eq!(failed[1]["reason"], "Deal not found");
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_strict_mode_success() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ["deal-a1", "deal-a2", "deal-a1"], "stageName": "Proposta" }),
            )
            .await;
        assert!(result.is_success(), "{:?}", result);
        let data = result.data().unwrap();
        assert_eq!(data["moved"], 1);
        assert_eq!(data["unchanged"], 1);
        assert_eq!(data["results"].as_array().unwrap().len(), 2);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_mode_reports_each_item() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({
                    "dealIds": ["deal-a1", "deal-a4", "deal-a5"],
                    "stageName": "Proposta",
                    "allowPartial": true,
                }),
            )
            .await;
        assert_eq!(result.error_code(), Some(ErrorCode::PartialFailure));
        let data = result.data().unwrap();
        assert_eq!(data["moved"], 1);
        assert_eq!(data["skipped"], 2);
        assert_eq!(data["results"][0]["status"], "moved");
        assert_eq!(data["results"][1]["reason"], "Deal is already closed as lost");
        assert_eq!(store.row(Table::Deals, "deal-a1").unwrap()["stage_id"], "st-a-prop");
    }

    #[tokio::test]
    async fn test_cap_checked_before_any_read() {
        let store = seed();
        let tools = toolset_with(&store, ctx_a(), ToolsConfig::default().with_bulk_caps(2, 3));
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ["deal-a1", "deal-a2", "deal-a5"], "stageName": "Novo" }),
            )
            .await;
        assert_eq!(result.error_code(), Some(ErrorCode::ValidationError));
        assert_eq!(store.select_count(), 0);

        let raised = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ["deal-a1", "deal-a2", "deal-a5", "x"], "stageName": "Novo", "maxDeals": 10 }),
            )
            .await;
        assert_eq!(raised.error_code(), Some(ErrorCode::ValidationError));
        assert_eq!(store.select_count(), 0);
    }

    #[tokio::test]
    async fn test_cap_counts_repeated_ids() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let ids = vec!["deal-a1"; 25];
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ids, "stageName": "Proposta", "maxDeals": 20 }),
            )
            .await;
        assert_eq!(
            result.error_message(),
            Some("Too many deals: 25 requested, at most 20 per call")
        );
        assert_eq!(store.select_count(), 0);
        assert_eq!(store.row(Table::Deals, "deal-a1").unwrap()["stage_id"], "st-a-novo");
    }

    #[tokio::test]
    async fn test_empty_list_rejected() {
        let store = seed();
        let tools = toolset(&store, ctx_a());
        let result = tools
            .execute_json("moveDealsBulk", json!({ "dealIds": [], "stageName": "Novo" }))
            .await;
        assert_eq!(result.error_code(), Some(ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn test_store_failure_mid_commit_lists_moved_ids() {
        let store = seed();
        store.put(
            Table::Deals,
            json!({
                "id": "deal-a6", "organization_id": "org-a", "board_id": "board-a",
                "stage_id": "st-a-novo", "title": "Extra", "value": 10.0,
            }),
        );
        let tools = toolset(&store, ctx_a());
        store.fail_write_after(1, StoreError::Transient("connection reset".into()));
        let result = tools
            .execute_json(
                "moveDealsBulk",
                json!({ "dealIds": ["deal-a1", "deal-a6"], "stageName": "Proposta" }),
            )
            .await;
        assert_eq!(result.error_code(), Some(ErrorCode::ApiError));
        let data = result.data().unwrap();
        assert_eq!(data["moved"], json!(["deal-a1"]));
        assert_eq!(data["failedAt"], "deal-a6");
        assert!(!result.error_message().unwrap().contains("connection reset"));
    }
}
