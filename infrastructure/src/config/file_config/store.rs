//! Store access configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Deadline for a single store call, in milliseconds
    pub timeout_ms: u64,
    /// Extra attempts for reads failing with a transient error
    pub read_retries: u32,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            read_retries: 1,
        }
    }
}
