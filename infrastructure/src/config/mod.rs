//! Configuration file loading for dealdesk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEALDESK_` environment variables (`DEALDESK_BULK__HARD_MAX_DEALS=50`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dealdesk.toml` or `./.dealdesk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/dealdesk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, FileAuditConfig, FileBulkConfig, FileConfig,
    FileContactsConfig, FileStoreConfig, FileToolsConfig, Severity,
};
pub use loader::ConfigLoader;
