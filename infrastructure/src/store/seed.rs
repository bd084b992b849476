//! Seed datasets for the in-memory store.
//!
//! A seed document is one JSON object keyed by table name:
//!
//! ```json
//! {
//!   "organizations": [{ "id": "org-1", "name": "Acme" }],
//!   "deals": [{ "id": "d1", "organization_id": "org-1", "title": "Renewal" }]
//! }
//! ```
//!
//! Every row must be an object, and rows of tenant-scoped tables must carry
//! an `organization_id`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dealdesk_application::ports::entity_store::Row;
use dealdesk_domain::Table;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown table '{0}' in seed")]
    UnknownTable(String),

    #[error("Seed entry for '{table}' must be {expected}")]
    NotAnObject { table: String, expected: &'static str },

    #[error("Row {index} of '{table}' has no organization_id")]
    MissingOrganization { table: String, index: usize },
}

/// Parsed, validated seed rows grouped by table
#[derive(Debug, Default, Clone)]
pub struct SeedData {
    tables: HashMap<Table, Vec<Row>>,
}

impl SeedData {
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_value(document: Value) -> Result<Self, SeedError> {
        let Value::Object(entries) = document else {
            return Err(SeedError::NotAnObject {
                table: "<root>".to_string(),
                expected: "an object keyed by table name",
            });
        };

        let mut tables = HashMap::new();
        for (name, rows) in entries {
            let table = Table::from_name(&name).ok_or_else(|| SeedError::UnknownTable(name.clone()))?;
            let Value::Array(rows) = rows else {
                return Err(SeedError::NotAnObject {
                    table: name,
                    expected: "an array of rows",
                });
            };

            let mut parsed = Vec::with_capacity(rows.len());
            for (index, row) in rows.into_iter().enumerate() {
                let Value::Object(row) = row else {
                    return Err(SeedError::NotAnObject {
                        table: name,
                        expected: "an array of objects",
                    });
                };
                if table.is_tenant_scoped()
                    && !row.get("organization_id").is_some_and(Value::is_string)
                {
                    return Err(SeedError::MissingOrganization { table: name, index });
                }
                parsed.push(row);
            }
            tables.insert(table, parsed);
        }
        Ok(Self { tables })
    }

    /// Number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn into_tables(self) -> HashMap<Table, Vec<Row>> {
        self.tables
    }
}
