//! HTTP request parsing.
//!
//! Turns raw request bytes into an [`HttpRequest`], including the query
//! string, urlencoded form bodies, and multipart/form-data bodies.

mod request;
mod method;
mod version;
mod form;
mod multipart;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use form::{decode_component, parse_form};
pub use multipart::{boundary_from_content_type, parse_multipart, Part};
pub use error::Error;

pub use request::parse_request;
