//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod entity_store;
pub mod tool_audit;
pub mod tool_executor;
pub mod tool_schema;
