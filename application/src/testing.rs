//! Test doubles shared by the use case tests.
//!
//! [`FakeStore`] evaluates queries with the port's own filter semantics and
//! can inject failures, hangs and count calls. [`seed`] loads a two-tenant
//! dataset: organization A with a "Vendas" board (Novo, Proposta, Ganho,
//! Perdido) and a second board, organization B with its own "sales" board.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dealdesk_domain::{CallingContext, Table};
use serde_json::{Value, json};

use crate::config::ToolsConfig;
use crate::ports::clock::FixedClock;
use crate::ports::entity_store::{EntityStore, Filter, Query, Row, StoreError};
use crate::ports::tool_audit::NoToolAuditLogger;
use crate::use_cases::crm_tools::{CrmToolset, ToolFactory};

#[derive(Default)]
struct FailurePlan {
    selects: Vec<StoreError>,
    writes_ok_before_failure: Option<usize>,
    writes: Vec<StoreError>,
    hang_selects: bool,
}

#[derive(Default)]
struct State {
    tables: HashMap<Table, Vec<Row>>,
    next_id: u64,
    select_count: usize,
    write_count: usize,
    plan: FailurePlan,
}

#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<State>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, table: Table, value: Value) {
        let mut state = self.state.lock().unwrap();
        let row = value.as_object().cloned().unwrap();
        state.tables.entry(table).or_default().push(row);
    }

    pub(crate) fn rows(&self, table: Table) -> Vec<Row> {
        let state = self.state.lock().unwrap();
        state.tables.get(&table).cloned().unwrap_or_default()
    }

    pub(crate) fn row(&self, table: Table, id: &str) -> Option<Row> {
        self.rows(table)
            .into_iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
    }

    pub(crate) fn select_count(&self) -> usize {
        self.state.lock().unwrap().select_count
    }

    pub(crate) fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_count
    }

    pub(crate) fn reset_counts(&self) {
        let mut state = self.state.lock().unwrap();
        state.select_count = 0;
        state.write_count = 0;
    }

    pub(crate) fn fail_next_selects(&self, count: usize, err: StoreError) {
        let mut state = self.state.lock().unwrap();
        state.plan.selects = vec![err; count];
    }

    pub(crate) fn fail_next_writes(&self, count: usize, err: StoreError) {
        let mut state = self.state.lock().unwrap();
        state.plan.writes = vec![err; count];
        state.plan.writes_ok_before_failure = Some(0);
    }

    /// Let `successes` writes through, then fail the next one
    pub(crate) fn fail_write_after(&self, successes: usize, err: StoreError) {
        let mut state = self.state.lock().unwrap();
        state.plan.writes = vec![err];
        state.plan.writes_ok_before_failure = Some(successes);
    }

    pub(crate) fn hang_selects(&self, hang: bool) {
        self.state.lock().unwrap().plan.hang_selects = hang;
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.write_count += 1;
        match state.plan.writes_ok_before_failure {
            Some(0) if !state.plan.writes.is_empty() => Err(state.plan.writes.remove(0)),
            Some(n) if n > 0 => {
                state.plan.writes_ok_before_failure = Some(n - 1);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl EntityStore for FakeStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.select_count += 1;
            if !state.plan.selects.is_empty() {
                return Err(state.plan.selects.remove(0));
            }
            state.plan.hang_selects
        };
        if hang {
            std::future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        Ok(query.apply(state.tables.get(&query.table).into_iter().flatten()))
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        self.begin_write()?;
        let mut state = self.state.lock().unwrap();
        if !row.contains_key("id") {
            state.next_id += 1;
            let id = format!("{}-{}", table.as_str(), state.next_id);
            row.insert("id".to_string(), Value::String(id));
        }
        state.tables.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        self.begin_write()?;
        let mut state = self.state.lock().unwrap();
        let mut changed = Vec::new();
        for row in state.tables.entry(table).or_default().iter_mut() {
            if filters.iter().all(|f| f.matches(row)) {
                for (k, v) in &patch {
                    row.insert(k.clone(), v.clone());
                }
                changed.push(row.clone());
            }
        }
        Ok(changed)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError> {
        self.begin_write()?;
        let mut state = self.state.lock().unwrap();
        let rows = state.tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
        Ok((before - rows.len()) as u64)
    }
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

fn days_ago(days: i64) -> Value {
    json!(now() - Duration::days(days))
}

/// Two-tenant dataset; see the module docs.
pub(crate) fn seed() -> Arc<FakeStore> {
    let store = FakeStore::new();

    store.put(Table::Organizations, json!({ "id": "org-a", "name": "Acme Vendas" }));
    store.put(Table::Organizations, json!({ "id": "org-b", "name": "Globex" }));

    for (id, org, name) in [
        ("user-a1", "org-a", "Ana"),
        ("user-a2", "org-a", "Bruno"),
        ("user-b1", "org-b", "Carla"),
    ] {
        store.put(
            Table::Profiles,
            json!({ "id": id, "organization_id": org, "first_name": name, "role": "user" }),
        );
    }

    for (id, org, name, key) in [
        ("board-a", "org-a", "Vendas", "sales"),
        ("board-a2", "org-a", "Pós-venda", "post-sales"),
        ("board-b", "org-b", "Sales", "sales"),
    ] {
        store.put(
            Table::Boards,
            json!({ "id": id, "organization_id": org, "name": name, "key": key }),
        );
    }

    for (id, org, board, label, order, lifecycle) in [
        ("st-a-novo", "org-a", "board-a", "Novo", 0, None),
        ("st-a-prop", "org-a", "board-a", "Proposta", 1, None),
        ("st-a-ganho", "org-a", "board-a", "Ganho", 2, Some("won")),
        ("st-a-perdido", "org-a", "board-a", "Perdido", 3, Some("lost")),
        ("st-a2-onb", "org-a", "board-a2", "Onboarding", 0, None),
        ("st-a2-ativo", "org-a", "board-a2", "Ativo", 1, None),
        ("st-b-novo", "org-b", "board-b", "Novo", 0, None),
        ("st-b-prop", "org-b", "board-b", "Proposta", 1, None),
    ] {
        store.put(
            Table::BoardStages,
            json!({
                "id": id, "organization_id": org, "board_id": board,
                "label": label, "order": order, "linked_lifecycle": lifecycle,
            }),
        );
    }

    store.put(Table::Companies, json!({ "id": "co-a1", "organization_id": "org-a", "name": "Acme" }));

    store.put(
        Table::Contacts,
        json!({
            "id": "contact-a1", "organization_id": "org-a", "name": "Maria Silva",
            "email": "maria@acme.com", "phone": "+5511987654321", "company_id": "co-a1",
            "owner_id": "user-a1", "created_at": days_ago(60),
        }),
    );
    store.put(
        Table::Contacts,
        json!({
            "id": "contact-b1", "organization_id": "org-b", "name": "João Souza",
            "email": "joao@globex.com", "phone": "+5521912345678",
            "owner_id": "user-b1", "created_at": days_ago(60),
        }),
    );

    for (id, org, board, stage, title, value, won, lost, changed) in [
        ("deal-a1", "org-a", "board-a", "st-a-novo", "Contrato Acme", 1000.0, false, false, 30),
        ("deal-a2", "org-a", "board-a", "st-a-prop", "Expansão Acme", 5000.0, false, false, 1),
        ("deal-a3", "org-a", "board-a", "st-a-ganho", "Renovação Beta", 2000.0, true, false, 10),
        ("deal-a4", "org-a", "board-a", "st-a-perdido", "Piloto Gama", 800.0, false, true, 20),
        ("deal-a5", "org-a", "board-a2", "st-a2-onb", "Implantação Acme", 300.0, false, false, 3),
        ("deal-b1", "org-b", "board-b", "st-b-novo", "Globex Deal", 9000.0, false, false, 40),
    ] {
        let owner = if org == "org-a" { "user-a1" } else { "user-b1" };
        let contact = (id == "deal-a1").then_some("contact-a1");
        store.put(
            Table::Deals,
            json!({
                "id": id, "organization_id": org, "board_id": board, "stage_id": stage,
                "title": title, "value": value, "priority": "medium",
                "owner_id": owner, "contact_id": contact,
                "is_won": won, "is_lost": lost,
                "last_stage_change_date": days_ago(changed),
                "created_at": days_ago(90), "updated_at": days_ago(changed),
            }),
        );
    }

    for (id, org, deal, kind, date, completed) in [
        ("act-a1", "org-a", "deal-a1", "TASK", days_ago(2), false),
        ("act-a2", "org-a", "deal-a2", "CALL", days_ago(-3), false),
        ("act-a3", "org-a", "deal-a2", "EMAIL", days_ago(5), true),
        ("act-b1", "org-b", "deal-b1", "TASK", days_ago(4), false),
    ] {
        store.put(
            Table::Activities,
            json!({
                "id": id, "organization_id": org, "deal_id": deal, "title": format!("{} {}", kind, id),
                "type": kind, "date": date, "completed": completed, "created_at": days_ago(10),
            }),
        );
    }

    store.put(
        Table::DealNotes,
        json!({
            "id": "note-a1", "organization_id": "org-a", "deal_id": "deal-a1",
            "content": "Cliente pediu desconto", "created_by": "user-a1", "created_at": days_ago(5),
        }),
    );
    store.put(
        Table::DealNotes,
        json!({
            "id": "note-b1", "organization_id": "org-b", "deal_id": "deal-b1",
            "content": "Segredo da Globex", "created_by": "user-b1", "created_at": days_ago(5),
        }),
    );

    store.reset_counts();
    Arc::new(store)
}

/// Seller Ana of organization A, conversation opened on the "Vendas" board
pub(crate) fn ctx_a() -> CallingContext {
    CallingContext::new("org-a", "user-a1").with_board("board-a")
}

pub(crate) fn toolset(store: &Arc<FakeStore>, ctx: CallingContext) -> CrmToolset {
    toolset_with(store, ctx, ToolsConfig::default())
}

pub(crate) fn toolset_with(
    store: &Arc<FakeStore>,
    ctx: CallingContext,
    config: ToolsConfig,
) -> CrmToolset {
    let acting_user = ctx.owner_id.clone();
    ToolFactory::new(store.clone())
        .with_clock(Arc::new(FixedClock(now())))
        .with_audit_logger(Arc::new(NoToolAuditLogger))
        .with_config(config)
        .create_tools(ctx, acting_user)
        .unwrap()
}
