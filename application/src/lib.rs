//! Application layer for dealdesk
//!
//! This crate contains the CRM tool use cases, port definitions, and the
//! tool configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::ToolsConfig;
pub use ports::{
    clock::{Clock, FixedClock, SystemClock},
    entity_store::{EntityStore, Filter, Order, Query, Row, StoreError},
    tool_audit::{NoToolAuditLogger, ToolAuditEvent, ToolAuditLogger},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::crm_tools::{ContextError, CrmToolset, ToolFactory};
