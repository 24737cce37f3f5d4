//! Per-request context handed to handlers.

use std::collections::HashMap;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::parser::{
    boundary_from_content_type, parse_form, parse_multipart, Error as ParserError, HttpRequest,
    Method,
};

/// A file received as a multipart/form-data part with a filename.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The form field name the file arrived under.
    pub name: String,
    /// The client-supplied filename.
    pub filename: String,
    /// The part's content type, if it sent one.
    pub content_type: Option<String>,
    /// The file contents.
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Copy the file contents to `dst`.
    ///
    /// The destination handle is created, written, and flushed inside this
    /// scope, so it is closed on success and on every error path. Returns
    /// the number of bytes written.
    pub async fn save(&self, dst: impl AsRef<Path>) -> Result<u64, std::io::Error> {
        let mut reader = self.data.as_slice();
        let mut file = tokio::fs::File::create(dst).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        Ok(written)
    }
}

/// The per-request bundle a handler works with.
///
/// Created at dispatch after a route has matched, dropped when the handler
/// returns. Form fields are populated from urlencoded and multipart bodies;
/// duplicate keys are last-write-wins throughout.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The request method.
    pub method: Method,
    /// The request path (query string already split off).
    pub path: String,
    /// The request headers.
    pub headers: HashMap<String, String>,
    /// Parameters captured from the matched route pattern.
    pub path_params: HashMap<String, String>,
    /// Query parameters.
    pub query_params: HashMap<String, String>,
    /// Form fields from an urlencoded or multipart body.
    pub form_fields: HashMap<String, String>,
    /// Files from multipart parts carrying a filename.
    pub files: Vec<UploadedFile>,
    /// The raw body bytes.
    pub body: Vec<u8>,
}

impl RequestContext {
    /// Build a context from a parsed request and the captures of the
    /// matched pattern.
    pub fn from_request(
        request: HttpRequest,
        path_params: HashMap<String, String>,
    ) -> Result<Self, ParserError> {
        let mut form_fields = HashMap::new();
        let mut files = Vec::new();

        if request.is_form_urlencoded() {
            let body = String::from_utf8_lossy(&request.body);
            form_fields = parse_form(&body);
        } else if request.is_multipart() {
            let content_type = request
                .get_header("Content-Type")
                .ok_or(ParserError::MissingBoundary)?;
            let boundary = boundary_from_content_type(content_type)?;
            for part in parse_multipart(&request.body, &boundary)? {
                match part.filename {
                    Some(filename) => files.push(UploadedFile {
                        name: part.name,
                        filename,
                        content_type: part.content_type,
                        data: part.data,
                    }),
                    None => {
                        form_fields.insert(
                            part.name,
                            String::from_utf8_lossy(&part.data).into_owned(),
                        );
                    }
                }
            }
        }

        Ok(Self {
            method: request.method,
            path: request.path,
            headers: request.headers,
            path_params,
            query_params: request.query_params,
            form_fields,
            files,
            body: request.body,
        })
    }

    /// Get a path parameter captured from the route pattern.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Get a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Get a form field.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form_fields.get(name).map(String::as_str)
    }

    /// Get an uploaded file by its form field name.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|file| file.name == name)
    }

    /// Get a header value. Header names are case-insensitive.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// The `Content-Type` header value, without its parameters.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
            .map(|v| v.split(';').next().unwrap_or(v.as_str()).trim())
    }

    /// Check if the request carried a JSON body.
    pub fn is_json(&self) -> bool {
        matches!(self.content_type(), Some("application/json"))
    }

    /// Check if the request carried an urlencoded form body.
    pub fn is_form_urlencoded(&self) -> bool {
        matches!(self.content_type(), Some("application/x-www-form-urlencoded"))
    }
}
