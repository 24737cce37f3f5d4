//! Error types for the HTTP server.

use thiserror::Error;

use crate::binder::Error as BindError;
use crate::parser::Error as ParserError;
use crate::router::Error as RouterError;
use crate::server::response::StatusCode;
use crate::server::templates::TemplateError;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error on the connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Routing failure (not found, method not allowed, duplicate route).
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Parameter binding failure.
    #[error("Binding error: {0}")]
    Bind(#[from] BindError),

    /// Template rendering failure.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Failure saving an uploaded file.
    #[error("File I/O error: {0}")]
    FileIo(std::io::Error),

    /// A handler wrote a second response for the same request.
    #[error("Response already written for this request")]
    ResponseAlreadyWritten,

    /// A handler returned without writing a response.
    #[error("Handler returned without writing a response")]
    MissingResponse,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl Error {
    /// The HTTP status this error translates to at the connection edge.
    ///
    /// Binding errors are the client's fault (400), routing errors map to
    /// their own statuses, and everything that went wrong on our side of
    /// the contract is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::ParseError(_) | Error::Bind(_) => StatusCode::BadRequest,
            Error::Router(RouterError::NotFound(_)) => StatusCode::NotFound,
            Error::Router(RouterError::MethodNotAllowed { .. }) => StatusCode::MethodNotAllowed,
            Error::Router(RouterError::DuplicateRoute { .. })
            | Error::IoError(_)
            | Error::Template(_)
            | Error::FileIo(_)
            | Error::ResponseAlreadyWritten
            | Error::MissingResponse
            | Error::JsonError(_)
            | Error::InternalError(_) => StatusCode::InternalServerError,
        }
    }
}
