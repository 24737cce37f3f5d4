//! A minimal HTTP routing and parameter-binding library.
//!
//! This library provides a small, explicit contract for dispatching HTTP
//! requests to handlers and binding request data into typed structs, with a
//! focus on simplicity and correctness.
//!
//! # Features
//!
//! - Route registration per (method, path pattern) pair, with `:name`
//!   capture segments and first-registered-wins precedence
//! - A per-request [`RequestContext`](router::RequestContext) bundling path
//!   parameters, query parameters, form fields, uploaded files, and the raw
//!   body
//! - Schema-driven binding into any `serde`-deserializable struct, each
//!   field declaring its key, kind, and source priority
//! - A single-write [`ResponseWriter`](server::ResponseWriter) capability
//!   for JSON, template-rendered HTML, and plain-text responses
//! - A tokio-based hosting server with graceful shutdown, and a minimal
//!   outbound client
//!
//! # Examples
//!
//! ## Routing
//!
//! ```
//! use microroute_rs::{Method, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/users/:id", |ctx, writer| async move {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     writer.write_text(StatusCode::Ok, id)
//! }).unwrap();
//! ```
//!
//! ## Binding
//!
//! ```
//! use microroute_rs::{BindSchema, FieldKind, FieldSpec};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! struct User {
//!     #[serde(default)]
//!     name: String,
//!     #[serde(default)]
//!     email: String,
//! }
//!
//! // Each field resolves from path, query, form, then body, in that order.
//! let schema = BindSchema::new()
//!     .field(FieldSpec::new("name", FieldKind::String))
//!     .field(FieldSpec::new("email", FieldKind::String));
//! ```
//!
//! ## Parsing a raw request
//!
//! ```
//! use microroute_rs::parse_request;
//!
//! let request_bytes = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! match parse_request(request_bytes) {
//!     Ok(request) => {
//!         println!("Method: {}", request.method);
//!         println!("Path: {}", request.path);
//!     },
//!     Err(err) => {
//!         println!("Error parsing request: {}", err);
//!     }
//! }
//! ```
//!
//! See the `demos` directory for complete servers: routing, binding,
//! template rendering, file upload, and an outbound request.

// Export the parser module
pub mod parser;

// Export the routing and binding modules
pub mod router;
pub mod binder;

// Export the server module
pub mod server;

// Export the outbound client module
pub mod client;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use router::{Error as RouterError, RequestContext, RoutePattern, Router, UploadedFile};
pub use binder::{BindSchema, Error as BindError, FieldKind, FieldSpec, Source};
pub use server::{
    Error as ServerError, HttpResponse, HttpServer, Renderer, ResponseWriter, ServerConfig,
    StatusCode, TemplateError, TemplateStore,
};
pub use client::{fetch, get, ClientResponse, Error as ClientError};
