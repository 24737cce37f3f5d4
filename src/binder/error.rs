//! Error types for parameter binding.

use thiserror::Error;

use crate::binder::schema::FieldKind;

/// Errors that can occur while binding a request into a typed object.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field had to resolve from the body, but the body content
    /// type is neither JSON nor an urlencoded form.
    #[error("Unsupported content type for body binding: {0}")]
    UnsupportedContentType(String),

    /// The body claims JSON but does not parse as a JSON object. The whole
    /// bind fails; no partially populated object is produced.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// A source value could not be converted to the field's declared kind.
    #[error("Field {field} does not parse as {kind}: {value:?}")]
    TypeMismatch {
        field: String,
        kind: FieldKind,
        value: String,
    },

    /// A required field was satisfied by no source.
    #[error("Required field is missing: {0}")]
    MissingField(String),

    /// The assembled values do not deserialize into the target type.
    #[error("Bound values do not fit the target type: {0}")]
    Deserialize(serde_json::Error),
}
