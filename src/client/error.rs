//! Error types for the outbound client.

use thiserror::Error;

/// Errors that can occur while performing an outbound request.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL does not use the `http://` scheme.
    #[error("Only http URLs are supported: {0}")]
    UnsupportedScheme(String),

    /// The URL cannot be split into host, port, and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O error on the connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The response could not be parsed.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Error parsing a JSON response body.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
