//! Tool Executor port
//!
//! Defines the interface the agent loop uses to invoke CRM tools.

use async_trait::async_trait;
use dealdesk_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// An implementation is bound to one calling context; the agent loop only
/// ever passes a tool name and its JSON arguments.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available (canonical name or alias)
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get_resolved(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Get names of all available tools, sorted
    fn available_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tool_spec().names().collect();
        names.sort_unstable();
        names
    }

    /// Execute a tool call asynchronously. Never panics across this boundary;
    /// every failure is a structured [`ToolResult`].
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Execute a tool call from a blocking context.
    ///
    /// Requires a multi-threaded tokio runtime to be running.
    fn execute_sync(&self, call: &ToolCall) -> ToolResult;
}
