//! Contact handling from TOML (`[contacts]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContactsConfig {
    /// Calling code prepended to national phone numbers, digits only
    pub default_country_code: String,
}

impl Default for FileContactsConfig {
    fn default() -> Self {
        Self {
            default_country_code: "55".to_string(),
        }
    }
}
