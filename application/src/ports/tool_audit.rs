//! Port for structured tool-call auditing.
//!
//! Defines the [`ToolAuditLogger`] trait for recording one event per tool
//! invocation (tool name, tenant, acting user, outcome) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable trail (JSONL) of what the agent did on whose behalf.

use dealdesk_domain::ErrorCode;
use serde::Serialize;

/// One audited tool invocation.
///
/// Carries ids and outcome only; tool inputs and row contents are never
/// recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolAuditEvent {
    pub tool: String,
    pub organization_id: String,
    pub acting_user_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub duration_ms: u64,
    /// Whether the tool is allowed to write (risk level `high`)
    pub mutating: bool,
}

/// Port for logging tool invocations.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; a failing sink must
/// never turn a successful tool call into a failed one.
pub trait ToolAuditLogger: Send + Sync {
    fn log(&self, event: ToolAuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoToolAuditLogger;

impl ToolAuditLogger for NoToolAuditLogger {
    fn log(&self, _event: ToolAuditEvent) {}
}
