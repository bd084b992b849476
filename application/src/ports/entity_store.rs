//! Entity store port
//!
//! Thin query/command interface to the multi-tenant relational store. The
//! tool layer depends only on this contract; adapters live in the
//! infrastructure layer.
//!
//! Rows are plain JSON objects keyed by column name. [`Filter::matches`] and
//! [`compare_values`] define the comparison semantics so every adapter that
//! evaluates filters in memory agrees with the others.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealdesk_domain::Table;
use serde_json::Value;
use thiserror::Error;

/// A store row: column name → value
pub type Row = serde_json::Map<String, Value>;

/// Errors reported by a store adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Row not found in {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Transient store failure: {0}")]
    Transient(String),

    #[error("Store call timed out after {0}ms")]
    Timeout(u64),
}

impl StoreError {
    /// Whether an idempotent read may be retried after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient(_) | StoreError::Timeout(_))
    }
}

/// Row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Neq(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    In(String, Vec<Value>),
    /// Case-insensitive substring match
    ILike(String, String),
    IsNull(String),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn neq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Neq(column.to_string(), value.into())
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Filter::Lt(column.to_string(), value.into())
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Lte(column.to_string(), value.into())
    }

    pub fn gt(column: &str, value: impl Into<Value>) -> Self {
        Filter::Gt(column.to_string(), value.into())
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Gte(column.to_string(), value.into())
    }

    pub fn is_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(column.to_string(), values.into_iter().map(Into::into).collect())
    }

    pub fn ilike(column: &str, needle: impl Into<String>) -> Self {
        Filter::ILike(column.to_string(), needle.into())
    }

    pub fn is_null(column: &str) -> Self {
        Filter::IsNull(column.to_string())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _)
            | Filter::Neq(c, _)
            | Filter::Lt(c, _)
            | Filter::Lte(c, _)
            | Filter::Gt(c, _)
            | Filter::Gte(c, _)
            | Filter::In(c, _)
            | Filter::ILike(c, _)
            | Filter::IsNull(c) => c,
        }
    }

    /// Evaluate this predicate against a row. A missing column is `null`;
    /// range comparisons against `null` never match.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(self.column()).unwrap_or(&Value::Null);
        match self {
            Filter::Eq(_, v) => values_equal(cell, v),
            Filter::Neq(_, v) => !values_equal(cell, v),
            Filter::Lt(_, v) => compare_present(cell, v) == Some(Ordering::Less),
            Filter::Lte(_, v) => matches!(
                compare_present(cell, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::Gt(_, v) => compare_present(cell, v) == Some(Ordering::Greater),
            Filter::Gte(_, v) => matches!(
                compare_present(cell, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::In(_, values) => values.iter().any(|v| values_equal(cell, v)),
            Filter::ILike(_, needle) => cell
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Filter::IsNull(_) => cell.is_null(),
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => compare_values(a, b) == Ordering::Equal && a.is_null() == b.is_null(),
    }
}

fn compare_present(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_null() || b.is_null() {
        return None;
    }
    Some(compare_values(a, b))
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Total order over cell values used for filtering and sorting.
///
/// Numbers compare numerically, RFC 3339 strings chronologically, other
/// strings lexicographically. `null` sorts after everything.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => match (as_timestamp(a), as_timestamp(b)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Sort key of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A `select` against one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Ordering of two rows under this query's sort keys
    pub fn compare_rows(&self, a: &Row, b: &Row) -> Ordering {
        for key in &self.order {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
            let ord = compare_values(left, right);
            let ord = if key.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Apply filters, ordering and limit to an in-memory row set
    pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<Row> {
        let mut matched: Vec<Row> = rows
            .into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.compare_rows(a, b));
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// Port for the relational store
///
/// Adapters must give row-level atomic writes. `insert` assigns an `id`
/// when the row has none and returns the stored row; `update` returns every
/// row it changed.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, StoreError>;

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError>;
}
