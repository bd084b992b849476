//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: label normalization and blank-input helpers

pub mod error;
pub mod string;
