//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::form::parse_form;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Represents a parsed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path, with the query string split off
    pub path: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
    /// Query parameters parsed from the request target, last-write-wins
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new request from a request target.
    ///
    /// The target may carry a query string (`/show?team=x`); it is split off
    /// into `query_params` and `path` keeps only the path portion.
    pub fn new(
        method: Method,
        target: String,
        version: HttpVersion,
        headers: HashMap<String, String>,
    ) -> Self {
        let (path, query_params) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_form(query)),
            None => (target, HashMap::new()),
        };

        Self {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
            query_params,
        }
    }

    /// Create a new request with a body.
    pub fn with_body(
        method: Method,
        target: String,
        version: HttpVersion,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let mut request = Self::new(method, target, version, headers);
        request.body = body;
        request
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

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// The `Content-Type` header value, without its parameters.
    ///
    /// `multipart/form-data; boundary=x` yields `multipart/form-data`.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
            .map(|v| v.split(';').next().unwrap_or(v.as_str()).trim())
    }

    /// Check if the request has a JSON body.
    pub fn is_json(&self) -> bool {
        matches!(self.content_type(), Some("application/json"))
    }

    /// Check if the request has an urlencoded form body.
    pub fn is_form_urlencoded(&self) -> bool {
        matches!(self.content_type(), Some("application/x-www-form-urlencoded"))
    }

    /// Check if the request has a multipart/form-data body.
    pub fn is_multipart(&self) -> bool {
        matches!(self.content_type(), Some("multipart/form-data"))
    }

    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader(
                "Content-Type: application/json".to_string(),
            ));
        }

        let json = serde_json::from_slice(&self.body)?;
        Ok(json)
    }

    /// Get a query parameter value.
    pub fn get_query_param(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Check if a query parameter exists.
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains_key(name)
    }
}

/// Locate the first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse an HTTP request from a byte slice.
///
/// The head (request line and headers) must be valid UTF-8; the body is kept
/// as raw bytes, truncated to `Content-Length` when the header is present.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    // Split the head from the body at the blank line. A request without one
    // is all head; bodies only arrive behind complete headers.
    let (head, body) = match find_subsequence(input, b"\r\n\r\n") {
        Some(pos) => (&input[..pos], &input[pos + 4..]),
        None => (input, &input[input.len()..]),
    };

    let head_str = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(_) => return Err(Error::MalformedRequestLine("Invalid UTF-8".to_string())),
    };

    let mut lines = head_str.lines();

    // Parse the request line
    let request_line = match lines.next() {
        Some(line) => line,
        None => return Err(Error::EmptyRequest),
    };

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;

    let target = parts[1].to_string();
    if target.is_empty() {
        return Err(Error::InvalidPath);
    }

    let version = HttpVersion::from_str(parts[2])?;

    // Parse the headers
    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }

        let parts: Vec<&str> = line.splitn(2, ':').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidHeaderFormat);
        }

        let name = parts[0].trim().to_string();
        let value = parts[1].trim().to_string();
        headers.insert(name, value);
    }

    // Check for required headers
    if version == HttpVersion::Http11
        && !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("Host"))
    {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    // Take the declared body length when the header is present and sane;
    // otherwise everything behind the blank line is the body.
    let declared_len = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let body = match declared_len {
        Some(len) => body[..len.min(body.len())].to_vec(),
        None => body.to_vec(),
    };

    Ok(HttpRequest::with_body(method, target, version, headers, body))
}
