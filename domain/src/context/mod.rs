//! Calling context: the tenant/board/user scoping bound into a toolset.
//!
//! A [`CallingContext`] is validated once when the toolset is built and is
//! never re-parsed per tool call. It is still *not* trusted as proof of
//! ownership: every tool re-checks the entities it touches against
//! [`CallingContext::organization_id`].

mod calling_context;

pub use calling_context::CallingContext;
