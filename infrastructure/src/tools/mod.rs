//! Tool catalog adapters
//!
//! - [`JsonSchemaToolConverter`]: renders the catalog as JSON Schema for an
//!   LLM tool-use API

pub mod schema;

pub use schema::JsonSchemaToolConverter;
