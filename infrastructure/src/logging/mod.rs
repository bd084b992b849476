//! Logging infrastructure: structured tool-call auditing.
//!
//! Provides [`JsonlToolAuditLogger`], a JSONL file writer that implements
//! the [`ToolAuditLogger`](dealdesk_application::ToolAuditLogger) port.

mod jsonl_audit;

pub use jsonl_audit::JsonlToolAuditLogger;
