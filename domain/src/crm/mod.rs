//! CRM domain module
//!
//! Entities of the multi-tenant store (boards, stages, deals, contacts,
//! activities, notes), their closed vocabularies, and the pure helpers the
//! tool layer uses to resolve loose identifiers coming from an LLM.
//!
//! Nothing here performs I/O. Tenant scoping is enforced by the application
//! layer's guard; the domain only describes which tables are tenant-scoped
//! ([`table::Table::is_tenant_scoped`]) and how each row exposes its
//! organization ([`table::OwnedEntity`]).

pub mod email;
pub mod entities;
pub mod matching;
pub mod phone;
pub mod table;
pub mod value_objects;

pub use entities::{Activity, Board, Company, Contact, Deal, Member, Note, Organization, Stage};
pub use table::{OwnedEntity, Table};
pub use value_objects::{ActivityType, DealStatus, Priority, StageLifecycle};
