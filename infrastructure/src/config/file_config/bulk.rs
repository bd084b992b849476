//! Bulk move configuration from TOML (`[bulk]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBulkConfig {
    /// Cap used when a call does not pass `maxDeals`
    pub default_max_deals: usize,
    /// Cap no call can raise
    pub hard_max_deals: usize,
}

impl Default for FileBulkConfig {
    fn default() -> Self {
        Self {
            default_max_deals: 20,
            hard_max_deals: 100,
        }
    }
}
