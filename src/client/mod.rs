//! Minimal outbound HTTP client.
//!
//! Issues a request over a plain TCP connection, reads the full response
//! body, and releases the connection on every exit path (the socket is
//! scoped to [`fetch`] and dropped when it returns, success or not).
//!
//! Requests go out as HTTP/1.0 with `Connection: close`, which keeps
//! responses unchunked and makes read-to-EOF the body boundary.

mod response;
mod error;

// Re-export public items
pub use response::ClientResponse;
pub use error::Error;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::parser::{HttpVersion, Method};
use response::parse_response;

/// Perform a request against an `http://` URL.
///
/// `Content-Type: application/json` and `Connection: close` are always
/// sent; `extra_headers` are appended after them.
pub async fn fetch(
    method: Method,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> Result<ClientResponse, Error> {
    let (host, port, path) = parse_url(url)?;

    let mut request = format!("{method} {path} {version}\r\n", version = HttpVersion::Http10);
    request.push_str(&format!("Host: {host}\r\n"));
    request.push_str("Content-Type: application/json\r\n");
    request.push_str("Connection: close\r\n");
    for (name, value) in extra_headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");

    let mut stream = TcpStream::connect((host.as_str(), port)).await?;
    stream.write_all(request.as_bytes()).await?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;

    parse_response(&raw)
}

/// Perform a GET request with no extra headers.
pub async fn get(url: &str) -> Result<ClientResponse, Error> {
    fetch(Method::GET, url, &[]).await
}

/// Split an `http://host[:port]/path` URL into its connection pieces.
fn parse_url(url: &str) -> Result<(String, u16, String), Error> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| Error::UnsupportedScheme(url.to_string()))?;

    let (authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, format!("/{path}")),
        None => (rest, "/".to_string()),
    };

    if authority.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }

    match authority.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| Error::InvalidUrl(url.to_string()))?;
            Ok((host.to_string(), port, path))
        }
        None => Ok((authority.to_string(), 80, path)),
    }
}
