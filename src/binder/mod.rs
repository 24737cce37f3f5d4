//! Schema-driven parameter binding.
//!
//! Populates typed structs from a [`RequestContext`](crate::router::RequestContext)
//! through an explicit per-field schema: each [`FieldSpec`] names its lookup
//! key, its value kind, and the ordered sources it resolves from. No
//! reflection; the schema is the single description of where a field comes
//! from.

mod schema;
mod error;
mod tests;

// Re-export public items
pub use schema::{BindSchema, FieldKind, FieldSpec, Source};
pub use error::Error;
