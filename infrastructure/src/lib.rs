//! Infrastructure layer for dealdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the in-memory entity store, the JSON Schema
//! tool converter, the JSONL audit logger and configuration file loading.

pub mod config;
pub mod logging;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, ConfigLoader, FileConfig, Severity};
pub use logging::JsonlToolAuditLogger;
pub use store::{InMemoryStore, SeedData, SeedError};
pub use tools::JsonSchemaToolConverter;
