//! Tool defaults from TOML (`[tools]` section)

use serde::{Deserialize, Serialize};

/// Raw tool defaults from TOML
///
/// ```toml
/// [tools]
/// default_list_limit = 10
/// max_list_limit = 50
/// default_stagnant_days = 7
/// max_note_length = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub default_list_limit: usize,
    pub max_list_limit: usize,
    pub default_stagnant_days: i64,
    pub max_note_length: usize,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            default_list_limit: 10,
            max_list_limit: 50,
            default_stagnant_days: 7,
            max_note_length: 10_000,
        }
    }
}
