//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of the tool boundary. Every tool
//! invocation produces exactly one [`ToolResult`], which serializes to one
//! of two shapes:
//!
//! ```text
//! { "ok": true,  "data": <small JSON object or list> }
//! { "ok": false, "error": "<message>", "code": "<ErrorCode>", "data"?: <details> }
//! ```
//!
//! Nothing else crosses the boundary: no raw store rows, no panics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error codes surfaced to the agent loop.
///
/// | Code | Meaning | Agent loop hint |
/// |------|---------|-----------------|
/// | `NOT_FOUND_OR_FORBIDDEN` | Missing, or owned by another tenant/board (indistinguishable) | Ask the user for a better reference |
/// | `VALIDATION_ERROR` | Malformed input or a state invariant violation | Fix arguments and retry |
/// | `PARTIAL_FAILURE` | Bulk run where only some items succeeded | Report per-item outcomes |
/// | `API_ERROR` | Store failure or timeout | Retry later or give up |
/// | `UNKNOWN_TOOL` | Tool name not in the catalog | Pick a listed tool |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFoundOrForbidden,
    ValidationError,
    PartialFailure,
    ApiError,
    UnknownTool,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFoundOrForbidden => "NOT_FOUND_OR_FORBIDDEN",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::PartialFailure => "PARTIAL_FAILURE",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::UnknownTool => "UNKNOWN_TOOL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error that occurred during tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    /// Human-readable message, safe to show to the end user
    pub message: String,
    /// Structured details (e.g. per-item bulk outcomes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The single error used for both "does not exist" and "belongs to
    /// someone else".
    pub fn not_found(kind: &str) -> Self {
        Self::new(
            ErrorCode::NotFoundOrForbidden,
            format!("{} not found", kind),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn partial_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PartialFailure, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiError, message)
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorCode::UnknownTool, format!("Unknown tool: {}", name))
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<crate::core::error::DomainError> for ToolError {
    fn from(err: crate::core::error::DomainError) -> Self {
        ToolError::validation(err.to_string())
    }
}

/// Result of a tool invocation.
///
/// `tool_name` and `metadata` are kept for logging and auditing and are not
/// part of the serialized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(skip)]
    pub tool_name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip)]
    pub metadata: ToolResultMetadata,
}

/// Execution metadata kept alongside a result (not serialized).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, data: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            ok: true,
            data: Some(data),
            error: None,
            code: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result; error details travel in `data`
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            ok: false,
            data: error.details,
            error: Some(error.message),
            code: Some(error.code),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn from_outcome(tool_name: impl Into<String>, outcome: Result<Value, ToolError>) -> Self {
        match outcome {
            Ok(data) => Self::success(tool_name, data),
            Err(error) => Self::failure(tool_name, error),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.ok
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The wire shape handed back to the agent loop
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "ok": false, "error": "Result could not be serialized", "code": "API_ERROR" })
        })
    }
}
