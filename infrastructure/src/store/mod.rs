//! Entity store adapters
//!
//! - [`InMemoryStore`]: process-local store, loaded from a JSON seed file
//! - [`SeedData`]: the `{ "<table>": [rows] }` seed document format

pub mod in_memory;
pub mod seed;

pub use in_memory::InMemoryStore;
pub use seed::{SeedData, SeedError};
