//! HTTP server implementation.
//!
//! Hosts a [`Router`](crate::router::Router) behind a tokio TCP listener,
//! and provides the response-side pieces handlers work with: the
//! [`ResponseWriter`] capability, the [`TemplateStore`], and the error-to-
//! status translation applied at the connection edge.

mod response;
mod config;
mod error;
mod templates;
mod writer;
mod http_server;
mod tests;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use templates::{Renderer, TemplateError, TemplateStore};
pub use writer::ResponseWriter;
pub use http_server::HttpServer;
