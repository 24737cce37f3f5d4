//! Responses returned by the outbound client.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::client::error::Error;

/// A response read in full from the server.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    /// The numeric status code.
    pub status: u16,
    /// The reason phrase from the status line.
    pub reason: String,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl ClientResponse {
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

    /// The body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = serde_json::from_slice(&self.body)?;
        Ok(value)
    }
}

/// Parse a raw HTTP response read to EOF.
pub(crate) fn parse_response(input: &[u8]) -> Result<ClientResponse, Error> {
    let head_end = input
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| Error::MalformedResponse("no header terminator".to_string()))?;

    let head = std::str::from_utf8(&input[..head_end])
        .map_err(|_| Error::MalformedResponse("headers are not UTF-8".to_string()))?;
    let body = &input[head_end + 4..];

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| Error::MalformedResponse("empty response".to_string()))?;

    // "HTTP/1.1 200 OK"
    let mut parts = status_line.splitn(3, ' ');
    let version = parts
        .next()
        .ok_or_else(|| Error::MalformedResponse(status_line.to_string()))?;
    if !version.starts_with("HTTP/") {
        return Err(Error::MalformedResponse(status_line.to_string()));
    }
    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| Error::MalformedResponse(status_line.to_string()))?;
    let reason = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::MalformedResponse(format!("invalid header: {line}")));
        };
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    // Respect Content-Length when present; read-to-EOF otherwise
    let declared_len = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let body = match declared_len {
        Some(len) => body[..len.min(body.len())].to_vec(),
        None => body.to_vec(),
    };

    Ok(ClientResponse {
        status,
        reason,
        headers,
        body,
    })
}
