//! Request routing and handler dispatch.
//!
//! A [`Router`] maps (method, path pattern) pairs to handlers. Patterns are
//! made of literal and `:name` capture segments; dispatch extracts the
//! captures, builds a [`RequestContext`], and invokes the handler with a
//! response-writing capability.

mod pattern;
mod context;
mod error;
#[allow(clippy::module_inception)]
mod router;

// Re-export public items
pub use pattern::RoutePattern;
pub use context::{RequestContext, UploadedFile};
pub use error::Error;
pub use router::{HandlerFn, HandlerFuture, Route, Router};
