//! Tool domain module
//!
//! This module defines the vocabulary of the CRM **tool layer**: the
//! operations an LLM agent loop may invoke against a tenant's pipeline.
//!
//! # Overview
//!
//! Every tool is defined by a [`ToolDefinition`] (name, parameters, risk level),
//! invoked via a [`ToolCall`], and answered with exactly one [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (catalog)    │    │ (invocation) │    │ { ok, ... }  │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "getDeal" → "getDealDetails"
//!        └─ tools:   "getDealDetails" → ToolDefinition
//! ```
//!
//! # Tool Names
//!
//! Incoming names are resolved through the alias table of [`ToolSpec`] and
//! then parsed into a [`ToolKind`]. Anything that does not parse is rejected
//! with `UNKNOWN_TOOL` before touching the store.
//!
//! # Risk
//!
//! | Risk | Examples |
//! |------|----------|
//! | **Low** | `searchDeals`, `listStages`, `analyzePipeline` |
//! | **High** | `moveDeal`, `moveDealsBulk`, `reorderStages` |
//!
//! High-risk tools write to the store and are audited.

pub mod catalog;
pub mod entities;
pub mod kind;
pub mod traits;
pub mod value_objects;

pub use catalog::{TOOL_ALIASES, crm_tool_spec, read_only_tool_spec};
pub use entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use kind::ToolKind;
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ErrorCode, ToolError, ToolResult, ToolResultMetadata};
