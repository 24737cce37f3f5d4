//! Multipart/form-data body parsing.
//!
//! Enough of RFC 7578 to serve form posts with file uploads: parts are
//! delimited by the boundary from the `Content-Type` header, each carrying a
//! `Content-Disposition` with a field name and, for files, a filename.

use crate::parser::error::Error;

/// A single part of a multipart/form-data body.
#[derive(Debug, Clone)]
pub struct Part {
    /// The form field name from `Content-Disposition`.
    pub name: String,
    /// The client-supplied filename, present for file parts only.
    pub filename: Option<String>,
    /// The part's own `Content-Type`, if it sent one.
    pub content_type: Option<String>,
    /// The raw part data.
    pub data: Vec<u8>,
}

/// Extract the boundary parameter from a `multipart/form-data` content type.
pub fn boundary_from_content_type(value: &str) -> Result<String, Error> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"').to_string())
        .filter(|b| !b.is_empty())
        .ok_or(Error::MissingBoundary)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse a multipart/form-data body into its parts.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<Vec<Part>, Error> {
    let delimiter = format!("--{boundary}").into_bytes();

    let start = find_subsequence(body, &delimiter)
        .ok_or_else(|| Error::MalformedMultipart("opening boundary not found".to_string()))?;

    let mut parts = Vec::new();
    let mut rest = &body[start + delimiter.len()..];

    loop {
        // After each boundary comes either the closing "--" or CRLF and a part.
        if rest.starts_with(b"--") {
            break;
        }
        let Some(block_start) = rest.strip_prefix(b"\r\n") else {
            return Err(Error::MalformedMultipart(
                "boundary not followed by CRLF".to_string(),
            ));
        };

        let inner_delimiter = format!("\r\n--{boundary}").into_bytes();
        let block_end = find_subsequence(block_start, &inner_delimiter)
            .ok_or_else(|| Error::MalformedMultipart("unterminated part".to_string()))?;

        parts.push(parse_part(&block_start[..block_end])?);
        rest = &block_start[block_end + inner_delimiter.len()..];
    }

    Ok(parts)
}

/// Parse one part block: headers, blank line, data.
fn parse_part(block: &[u8]) -> Result<Part, Error> {
    let header_end = find_subsequence(block, b"\r\n\r\n")
        .ok_or_else(|| Error::MalformedMultipart("part without header block".to_string()))?;

    let head = std::str::from_utf8(&block[..header_end])
        .map_err(|_| Error::MalformedMultipart("part headers are not UTF-8".to_string()))?;
    let data = block[header_end + 4..].to_vec();

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in head.lines() {
        let Some((header, value)) = line.split_once(':') else {
            return Err(Error::MalformedMultipart(format!(
                "invalid part header: {line}"
            )));
        };
        let value = value.trim();

        if header.eq_ignore_ascii_case("Content-Disposition") {
            name = disposition_param(value, "name");
            filename = disposition_param(value, "filename");
        } else if header.eq_ignore_ascii_case("Content-Type") {
            content_type = Some(value.to_string());
        }
    }

    let name = name.ok_or_else(|| {
        Error::MalformedMultipart("part without a field name".to_string())
    })?;

    Ok(Part {
        name,
        filename,
        content_type,
        data,
    })
}

/// Pull a quoted parameter such as `name="avatar"` out of a
/// `Content-Disposition` value.
fn disposition_param(value: &str, param: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|piece| piece.strip_prefix(&format!("{param}=")))
        .map(|v| v.trim_matches('"').to_string())
}
