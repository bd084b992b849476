//! Tool schema conversion port.
//!
//! Separates "which tools to expose" (domain) from "how to serialize for an
//! LLM API" (infrastructure). The domain layer defines [`ToolDefinition`] and
//! [`ToolSpec`]; this port handles the JSON Schema conversion.

use dealdesk_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to LLM API format (JSON Schema).
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to provider-neutral JSON Schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to JSON Schema array (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;

    /// Convert read-only tools only to JSON Schema array (sorted by name).
    fn read_only_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;
}
