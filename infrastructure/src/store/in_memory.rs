//! In-memory entity store.
//!
//! Reference adapter for the [`EntityStore`] port: every table is a vector
//! of JSON rows behind one `RwLock`. Filters, ordering and limits are
//! evaluated with [`Query::apply`], so results match what any other adapter
//! must return for the same query. Each write holds the lock for the whole
//! call, which makes single-row writes atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use dealdesk_application::ports::entity_store::{EntityStore, Filter, Query, Row, StoreError};
use dealdesk_domain::Table;
use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use super::seed::{SeedData, SeedError};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with a seed dataset.
    pub fn from_seed(seed: SeedData) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            for (table, rows) in seed.into_tables() {
                tables.entry(table).or_default().extend(rows);
            }
        }
        store
    }

    /// Build a store from a JSON seed document (see [`SeedData`]).
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(Self::from_seed(SeedData::from_json_str(json)?))
    }

    /// Copy of every row currently stored in `table`.
    pub fn snapshot(&self, table: Table) -> Vec<Row> {
        self.read()
            .map(|tables| tables.get(&table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Row of `table` with the given id, if any.
    pub fn find(&self, table: Table, id: &str) -> Option<Row> {
        self.snapshot(table)
            .into_iter()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
    }

    pub fn len(&self, table: Table) -> usize {
        self.read()
            .map(|tables| tables.get(&table).map_or(0, Vec::len))
            .unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Table, Vec<Row>>>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Transient("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Table, Vec<Row>>>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Transient("store lock poisoned".to_string()))
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let tables = self.read()?;
        let rows = query.apply(tables.get(&query.table).into_iter().flatten());
        trace!(table = %query.table, rows = rows.len(), "select");
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        let mut tables = self.write()?;
        let rows = tables.entry(table).or_default();

        let id = match row_id(&row) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                row.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        if rows.iter().any(|existing| row_id(existing) == Some(id.as_str())) {
            return Err(StoreError::Constraint(format!(
                "duplicate id in {}",
                table
            )));
        }
        if table.is_tenant_scoped() && !row.get("organization_id").is_some_and(Value::is_string) {
            return Err(StoreError::Constraint(format!(
                "{} rows require organization_id",
                table
            )));
        }

        rows.push(row.clone());
        debug!(table = %table, id = %id, "insert");
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        if patch.contains_key("id") || patch.contains_key("organization_id") {
            return Err(StoreError::Constraint(
                "id and organization_id cannot be updated".to_string(),
            ));
        }
        let mut tables = self.write()?;
        let mut changed = Vec::new();
        for row in tables.entry(table).or_default().iter_mut() {
            if filters.iter().all(|f| f.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                changed.push(row.clone());
            }
        }
        debug!(table = %table, rows = changed.len(), "update");
        Ok(changed)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
        let removed = (before - rows.len()) as u64;
        debug!(table = %table, rows = removed, "delete");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_uuid() {
        let store = InMemoryStore::new();
        let stored = store
            .insert(Table::Companies, row(json!({ "organization_id": "org-1", "name": "Acme" })))
            .await
            .unwrap();
        let id = stored["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(store.len(Table::Companies), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id_and_missing_org() {
        let store = InMemoryStore::new();
        store
            .insert(Table::Companies, row(json!({ "id": "c1", "organization_id": "org-1", "name": "A" })))
            .await
            .unwrap();
        let dup = store
            .insert(Table::Companies, row(json!({ "id": "c1", "organization_id": "org-1", "name": "B" })))
            .await
            .unwrap_err();
        assert!(matches!(dup, StoreError::Constraint(_)));

        let orphan = store
            .insert(Table::Companies, row(json!({ "name": "C" })))
            .await
            .unwrap_err();
        assert!(matches!(orphan, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let store = InMemoryStore::new();
        for (id, value) in [("d1", 300), ("d2", 100), ("d3", 200)] {
            store
                .insert(
                    Table::Deals,
                    row(json!({ "id": id, "organization_id": "org-1", "value": value })),
                )
                .await
                .unwrap();
        }
        let query = Query::from(Table::Deals)
            .filter(Filter::gte("value", 150))
            .order_by("value", true)
            .limit(1);
        let rows = store.select(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "d3");
    }

    #[tokio::test]
    async fn test_update_and_delete_respect_filters() {
        let store = InMemoryStore::new();
        for (id, org) in [("n1", "org-1"), ("n2", "org-2")] {
            store
                .insert(Table::DealNotes, row(json!({ "id": id, "organization_id": org, "content": "x" })))
                .await
                .unwrap();
        }
        let changed = store
            .update(
                Table::DealNotes,
                &[Filter::eq("id", "n2"), Filter::eq("organization_id", "org-1")],
                row(json!({ "content": "y" })),
            )
            .await
            .unwrap();
        assert!(changed.is_empty());

        let err = store
            .update(Table::DealNotes, &[Filter::eq("id", "n1")], row(json!({ "organization_id": "org-2" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let removed = store
            .delete(Table::DealNotes, &[Filter::eq("organization_id", "org-2")])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.find(Table::DealNotes, "n1").is_some());
    }
}
