//! Store access with deadlines and read retries.
//!
//! Every call is bounded by `store_timeout`. Reads that fail with a
//! transient error or time out are retried up to `read_retries` times;
//! writes are attempted exactly once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dealdesk_domain::{Table, ToolError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ToolsConfig;
use crate::ports::entity_store::{EntityStore, Filter, Query, Row, StoreError};

/// Build a row from a `json!` object literal
pub(crate) fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Map a store failure to the error the agent loop sees. Messages never
/// carry adapter details or internal ids.
pub(crate) fn store_failure(table: Table, err: StoreError) -> ToolError {
    warn!(table = %table, error = %err, "Store call failed");
    match err {
        StoreError::NotFound(_) => ToolError::not_found("Record"),
        StoreError::Constraint(_) => {
            ToolError::validation("The change conflicts with existing data")
        }
        StoreError::Transient(_) => ToolError::api("The CRM store is unavailable, try again"),
        StoreError::Timeout(_) => ToolError::api("The CRM store did not answer in time"),
    }
}

pub(crate) fn decode<E: DeserializeOwned>(table: Table, row: Row) -> Result<E, ToolError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        warn!(table = %table, error = %e, "Store returned an unreadable row");
        ToolError::api("The CRM store returned unreadable data")
    })
}

#[derive(Clone)]
pub(crate) struct StoreGateway {
    store: Arc<dyn EntityStore>,
    timeout: Duration,
    read_retries: u32,
}

impl StoreGateway {
    pub(crate) fn new(store: Arc<dyn EntityStore>, config: &ToolsConfig) -> Self {
        Self {
            store,
            timeout: config.store_timeout,
            read_retries: config.read_retries,
        }
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Raw select with deadline and retry
    pub(crate) async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let mut attempt = 0;
        loop {
            match self.timed(self.store.select(query)).await {
                Err(err) if err.is_retryable() && attempt < self.read_retries => {
                    attempt += 1;
                    warn!(table = %query.table, attempt, error = %err, "Retrying store read");
                }
                result => return result,
            }
        }
    }

    /// Select and decode rows
    pub(crate) async fn fetch<E: DeserializeOwned>(&self, query: &Query) -> Result<Vec<E>, ToolError> {
        let rows = self
            .select(query)
            .await
            .map_err(|e| store_failure(query.table, e))?;
        debug!(table = %query.table, rows = rows.len(), "Store read");
        rows.into_iter().map(|r| decode(query.table, r)).collect()
    }

    /// Insert one row and decode the stored version
    pub(crate) async fn insert<E: DeserializeOwned>(&self, table: Table, row: Row) -> Result<E, ToolError> {
        let stored = self
            .timed(self.store.insert(table, row))
            .await
            .map_err(|e| store_failure(table, e))?;
        decode(table, stored)
    }

    /// Update matching rows; returns the changed rows
    pub(crate) async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, ToolError> {
        self.timed(self.store.update(table, filters, patch))
            .await
            .map_err(|e| store_failure(table, e))
    }

    /// Update exactly one row addressed by id and organization
    pub(crate) async fn update_one<E: DeserializeOwned>(
        &self,
        table: Table,
        organization_id: &str,
        id: &str,
        patch: Row,
    ) -> Result<E, ToolError> {
        let filters = [
            Filter::eq("id", id),
            Filter::eq("organization_id", organization_id),
        ];
        let changed = self.update(table, &filters, patch).await?;
        match changed.into_iter().next() {
            Some(row) => decode(table, row),
            None => Err(store_failure(table, StoreError::NotFound(table.to_string()))),
        }
    }

    pub(crate) async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, ToolError> {
        self.timed(self.store.delete(table, filters))
            .await
            .map_err(|e| store_failure(table, e))
    }
}
