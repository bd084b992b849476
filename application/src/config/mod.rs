//! Application-level configuration.
//!
//! - [`ToolsConfig`]: store deadlines, list and bulk caps, input defaults

pub mod tools_config;

pub use tools_config::ToolsConfig;
