//! Shared setup for the integration suites: the sales seed loaded into an
//! [`InMemoryStore`] and toolsets bound to it with a frozen clock.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dealdesk_application::{CrmToolset, FixedClock, ToolAuditLogger, ToolFactory, ToolsConfig};
use dealdesk_domain::CallingContext;
use dealdesk_infrastructure::InMemoryStore;

pub const SALES_SEED: &str = include_str!("../../../fixtures/sales_seed.json");

pub const ACME: &str = "org-acme";
pub const GLOBEX: &str = "org-globex";

/// Sellers of the Acme organization, each owning board `board-s<n>`
pub const SELLERS: [(&str, &str); 5] = [
    ("seller-1", "Ana"),
    ("seller-2", "Bruno"),
    ("seller-3", "Carla"),
    ("seller-4", "Diego"),
    ("seller-5", "Elisa"),
];

/// Instant the seed's relative dates were computed from
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

pub fn days_from_now(days: i64) -> String {
    (now() + Duration::days(days)).to_rfc3339()
}

pub fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::from_json_str(SALES_SEED).expect("sales seed is valid"))
}

pub fn factory(store: &Arc<InMemoryStore>) -> ToolFactory {
    ToolFactory::new(store.clone()).with_clock(Arc::new(FixedClock(now())))
}

pub fn tools(store: &Arc<InMemoryStore>, ctx: CallingContext) -> CrmToolset {
    let acting = ctx.owner_id.clone();
    factory(store).create_tools(ctx, acting).unwrap()
}

pub fn tools_with(
    store: &Arc<InMemoryStore>,
    ctx: CallingContext,
    config: ToolsConfig,
    audit: Arc<dyn ToolAuditLogger>,
) -> CrmToolset {
    let acting = ctx.owner_id.clone();
    factory(store)
        .with_config(config)
        .with_audit_logger(audit)
        .create_tools(ctx, acting)
        .unwrap()
}

/// Seller `n` (1-based) working on their own board, on their open deal
pub fn seller_ctx(n: usize) -> CallingContext {
    let (seller, _) = SELLERS[n - 1];
    CallingContext::new(ACME, seller)
        .with_board(format!("board-s{n}"))
        .with_deal(format!("deal-s{n}-open"))
        .with_won_stage_label("Ganho")
}

pub fn globex_ctx() -> CallingContext {
    CallingContext::new(GLOBEX, "globex-1").with_board("board-globex")
}
