//! Domain layer for dealdesk
//!
//! This crate contains the CRM entities, the calling context a toolset is
//! bound to, and the tool catalog exposed to an LLM agent loop.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tenant scoping
//!
//! Every row belongs to an organization. A [`CallingContext`] carries the
//! organization, the optional current board/deal and the acting owner.
//!
//! ## Tools
//!
//! - **Read tools** (`RiskLevel::Low`): searches, listings and analyzers
//! - **Mutations** (`RiskLevel::High`): every tool that writes to the store

pub mod context;
pub mod core;
pub mod crm;
pub mod tool;

// Re-export commonly used types
pub use context::CallingContext;
pub use core::error::DomainError;
pub use crm::{
    Activity, ActivityType, Board, Company, Contact, Deal, DealStatus, Member, Note, Organization,
    OwnedEntity, Priority, Stage, StageLifecycle, Table,
};
pub use tool::{
    DefaultToolValidator, ErrorCode, ParamType, RiskLevel, ToolCall, ToolDefinition, ToolError,
    ToolKind, ToolParameter, ToolResult, ToolResultMetadata, ToolSpec, ToolValidator,
    crm_tool_spec,
};
