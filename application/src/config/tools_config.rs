//! Tool execution parameters.
//!
//! [`ToolsConfig`] groups the static limits a [`CrmToolset`](crate::use_cases::crm_tools::CrmToolset)
//! is built with: store timeouts and retries, list and bulk caps, and the
//! defaults applied when a tool input omits a value. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and defaults for the CRM tool layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Deadline for every single store call.
    pub store_timeout: Duration,
    /// Extra attempts for reads failing with a transient error or timeout.
    pub read_retries: u32,
    /// Bulk cap when the call does not pass `maxDeals`.
    pub default_max_deals: usize,
    /// Bulk cap no call can raise.
    pub hard_max_deals: usize,
    /// List size when the call does not pass `limit`.
    pub default_list_limit: usize,
    /// Largest accepted `limit`.
    pub max_list_limit: usize,
    /// Stagnation threshold when `daysStagnant` is omitted.
    pub default_stagnant_days: i64,
    pub max_note_length: usize,
    /// Calling code used to normalize national phone numbers.
    pub default_country_code: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
            read_retries: 1,
            default_max_deals: 20,
            hard_max_deals: 100,
            default_list_limit: 10,
            max_list_limit: 50,
            default_stagnant_days: 7,
            max_note_length: 10_000,
            default_country_code: "55".to_string(),
        }
    }
}

impl ToolsConfig {
    // ==================== Builder Methods ====================

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    pub fn with_bulk_caps(mut self, default_max: usize, hard_max: usize) -> Self {
        self.default_max_deals = default_max;
        self.hard_max_deals = hard_max;
        self
    }

    pub fn with_default_country_code(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = code.into();
        self
    }

    // ==================== Derived Limits ====================

    /// Effective list size for a requested `limit` (clamped to 1..=max).
    pub fn list_limit(&self, requested: Option<u64>) -> usize {
        let max = self.max_list_limit.max(1);
        match requested {
            Some(n) => usize::try_from(n).unwrap_or(max).clamp(1, max),
            None => self.default_list_limit.clamp(1, max),
        }
    }

    /// Effective bulk cap: `min(maxDeals ?? default, hard max)`.
    pub fn bulk_cap(&self, requested: Option<u64>) -> usize {
        let wanted = requested
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .unwrap_or(self.default_max_deals);
        wanted.min(self.hard_max_deals)
    }
}
