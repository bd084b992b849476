//! Audit log configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL file receiving one line per tool call; auditing is off when unset
    pub log_path: Option<String>,
}
