//! CRM tools
//!
//! The 29 tools the agent loop can call, bound to one calling context by
//! [`ToolFactory`]. Handlers are plain async functions over a
//! [`TenantScope`](scope::TenantScope); every row they touch is loaded
//! through the tenant guard.

mod activities;
mod analyzers;
mod args;
mod bulk;
mod contacts;
mod deals;
mod factory;
mod gateway;
mod guard;
mod notes;
mod resolvers;
mod scope;
mod stages;
mod toolset;

pub use factory::{ContextError, ToolFactory};
pub use toolset::CrmToolset;
