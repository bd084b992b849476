//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application's
//! [`ToolsConfig`] once validated.

mod audit;
mod bulk;
mod contacts;
mod store;
mod tools;

pub use audit::FileAuditConfig;
pub use bulk::FileBulkConfig;
pub use contacts::FileContactsConfig;
pub use store::FileStoreConfig;
pub use tools::FileToolsConfig;

use std::time::Duration;

use dealdesk_application::ToolsConfig;
use serde::{Deserialize, Serialize};

/// Largest accepted stagnation threshold (about one century)
pub const MAX_STAGNANT_DAYS: i64 = 36_500;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be used.
    Error,
    /// Usable, but probably not what was intended.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A value that must be positive is zero.
    ZeroValue { field: String },
    /// A value is above the largest accepted value.
    ValueTooLarge { field: String, max: i64 },
    /// The default bulk cap is above the hard cap and gets clamped.
    DefaultAboveHardCap,
    /// The default list size is above the largest accepted size.
    DefaultAboveMaxLimit,
    /// The country code is empty or not made of digits.
    InvalidCountryCode { value: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    fn zero(field: &str) -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::ZeroValue {
                field: field.to_string(),
            },
            message: format!("{field} must be greater than zero"),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Store deadlines and retries
    pub store: FileStoreConfig,
    /// Bulk move caps
    pub bulk: FileBulkConfig,
    /// List sizes and input defaults
    pub tools: FileToolsConfig,
    /// Phone normalization
    pub contacts: FileContactsConfig,
    /// JSONL audit trail
    pub audit: FileAuditConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("store.timeout_ms", self.store.timeout_ms),
            ("bulk.hard_max_deals", self.bulk.hard_max_deals as u64),
            ("tools.max_list_limit", self.tools.max_list_limit as u64),
            ("tools.max_note_length", self.tools.max_note_length as u64),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::zero(field));
            }
        }
        if self.tools.default_stagnant_days < 1 {
            issues.push(ConfigIssue::zero("tools.default_stagnant_days"));
        } else if self.tools.default_stagnant_days > MAX_STAGNANT_DAYS {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ValueTooLarge {
                    field: "tools.default_stagnant_days".to_string(),
                    max: MAX_STAGNANT_DAYS,
                },
                message: format!(
                    "tools.default_stagnant_days must be at most {MAX_STAGNANT_DAYS}"
                ),
            });
        }

        if self.bulk.default_max_deals > self.bulk.hard_max_deals {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::DefaultAboveHardCap,
                message: format!(
                    "bulk.default_max_deals ({}) is above bulk.hard_max_deals ({}), the hard cap applies",
                    self.bulk.default_max_deals, self.bulk.hard_max_deals
                ),
            });
        }
        if self.tools.default_list_limit > self.tools.max_list_limit {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::DefaultAboveMaxLimit,
                message: format!(
                    "tools.default_list_limit ({}) is above tools.max_list_limit ({})",
                    self.tools.default_list_limit, self.tools.max_list_limit
                ),
            });
        }

        let code = &self.contacts.default_country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::InvalidCountryCode { value: code.clone() },
                message: format!("contacts.default_country_code: '{code}' is not a calling code"),
            });
        }

        issues
    }

    /// Whether any issue makes the configuration unusable
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    /// Build the application-level tool configuration.
    pub fn to_tools_config(&self) -> ToolsConfig {
        ToolsConfig {
            store_timeout: Duration::from_millis(self.store.timeout_ms),
            read_retries: self.store.read_retries,
            default_max_deals: self.bulk.default_max_deals,
            hard_max_deals: self.bulk.hard_max_deals,
            default_list_limit: self.tools.default_list_limit,
            max_list_limit: self.tools.max_list_limit,
            default_stagnant_days: self.tools.default_stagnant_days,
            max_note_length: self.tools.max_note_length,
            default_country_code: self.contacts.default_country_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[store]
timeout_ms = 2500
read_retries = 0

[bulk]
default_max_deals = 10
hard_max_deals = 40

[tools]
max_note_length = 500

[contacts]
default_country_code = "1"

[audit]
log_path = "/var/log/dealdesk/audit.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.timeout_ms, 2500);
        assert_eq!(config.bulk.hard_max_deals, 40);
        assert_eq!(config.tools.max_note_length, 500);
        // Defaults should apply
        assert_eq!(config.tools.default_list_limit, 10);
        assert_eq!(
            config.audit.log_path.as_deref(),
            Some("/var/log/dealdesk/audit.jsonl")
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config_matches_tools_defaults() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.to_tools_config(), ToolsConfig::default());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut config = FileConfig::default();
        config.bulk.default_max_deals = 500;
        config.tools.max_list_limit = 0;
        config.contacts.default_country_code = "+55".to_string();

        let issues = config.validate();
        let codes: Vec<&ConfigIssueCode> = issues.iter().map(|i| &i.code).collect();
        assert!(codes.contains(&&ConfigIssueCode::DefaultAboveHardCap));
        assert!(codes.contains(&&ConfigIssueCode::ZeroValue {
            field: "tools.max_list_limit".to_string()
        }));
        assert!(codes.contains(&&ConfigIssueCode::InvalidCountryCode {
            value: "+55".to_string()
        }));
        assert!(config.has_errors());
    }

    #[test]
    fn test_stagnant_days_upper_bound() {
        let mut config = FileConfig::default();
        config.tools.default_stagnant_days = MAX_STAGNANT_DAYS + 1;
        assert_eq!(
            config.validate()[0].code,
            ConfigIssueCode::ValueTooLarge {
                field: "tools.default_stagnant_days".to_string(),
                max: MAX_STAGNANT_DAYS,
            }
        );
        assert!(config.has_errors());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut config = FileConfig::default();
        config.bulk.default_max_deals = 150;
        assert_eq!(config.validate().len(), 1);
        assert!(!config.has_errors());
        assert_eq!(config.to_tools_config().bulk_cap(None), 100);
    }
}
