//! Urlencoded key/value parsing, shared by query strings and form bodies.

use std::collections::HashMap;

/// Decode a single urlencoded component.
///
/// `+` decodes to a space and `%XX` escapes to their byte value. A `%` that
/// is not followed by two hex digits is kept literally rather than rejected;
/// query strings in the wild are not reliably well-formed.
pub fn decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi * 16 + lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    byte.and_then(|b| (*b as char).to_digit(16)).map(|d| d as u8)
}

/// Parse an `application/x-www-form-urlencoded` string into a map.
///
/// Duplicate keys are last-write-wins. A pair without `=` becomes a key with
/// an empty value.
pub fn parse_form(input: &str) -> HashMap<String, String> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            if let Some((k, v)) = pair.split_once('=') {
                (decode_component(k), decode_component(v))
            } else {
                (decode_component(pair), String::new())
            }
        })
        .collect()
}
