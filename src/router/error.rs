//! Error types for routing.

use thiserror::Error;

use crate::parser::Method;

/// Errors that can occur during route registration and dispatch.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered pattern matches the request path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A pattern matches the path, but under different methods only.
    #[error("Method {method} not allowed for path: {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        /// The methods the matching patterns are registered under.
        allowed: Vec<Method>,
    },

    /// The (method, pattern) pair is already registered.
    #[error("Route already registered: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },
}
