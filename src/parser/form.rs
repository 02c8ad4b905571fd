//! `application/x-www-form-urlencoded` decoding, shared by query strings and bodies.

use std::collections::HashMap;

/// Percent-decode one form component, treating `+` as a space.
///
/// Sequences that do not decode to UTF-8 are kept as they arrived.
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Percent-decode a request path. `+` is literal in paths.
pub fn decode_path(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Parse `a=1&b=two&flag` into a map. Later duplicates replace earlier ones;
/// a key without `=` maps to the empty string.
pub fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}
