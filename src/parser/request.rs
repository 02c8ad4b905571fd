//! HTTP request parsing and representation.

use std::collections::HashMap;
use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::form::{decode_path, parse_urlencoded};
use crate::parser::request_line::{HttpVersion, Method, RequestLine};

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target as sent, query string included
    pub target: String,
    /// The percent-decoded path, without the query string
    pub path: String,
    /// The raw query string, without the leading `?`
    pub query: Option<String>,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
    /// Decoded query parameters
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request with an empty body from a method and a raw target.
    pub fn new(method: Method, target: impl Into<String>, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        let target = target.into();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target.as_str(), None),
        };
        let path = decode_path(path);
        let query_params = query.as_deref().map(parse_urlencoded).unwrap_or_default();

        Self {
            method,
            target,
            path,
            query,
            version,
            headers,
            body: Vec::new(),
            query_params,
        }
    }

    /// Create a request carrying a body.
    pub fn with_body(method: Method, target: impl Into<String>, version: HttpVersion, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let mut request = Self::new(method, target, version, headers);
        request.body = body;
        request
    }

    /// Get a header value. Header names are matched case-insensitively.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    fn content_type_is(&self, mime: &str) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|value| value.trim_start().starts_with(mime))
    }

    /// Check if the request has a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type_is("application/json")
    }

    /// Check if the request has a url-encoded form body.
    pub fn is_form(&self) -> bool {
        self.content_type_is("application/x-www-form-urlencoded")
    }

    /// Parse the request body as JSON.
    ///
    /// Fails with [`Error::MissingHeader`] unless the request declares
    /// `Content-Type: application/json`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decoded fields of a url-encoded form body. Empty for any other content type.
    pub fn form_params(&self) -> HashMap<String, String> {
        if !self.is_form() {
            return HashMap::new();
        }
        parse_urlencoded(&String::from_utf8_lossy(&self.body))
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

/// Locate the blank line ending the request head.
///
/// Returns the length of the head and the length of the terminator.
fn find_head_end(input: &[u8]) -> Option<(usize, usize)> {
    let crlf = input.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, 4));
    let lf = input.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn content_length(headers: &HashMap<String, String>) -> Result<usize, Error> {
    match headers.iter().find(|(k, _)| k.eq_ignore_ascii_case("Content-Length")) {
        Some((_, value)) => value
            .parse()
            .map_err(|_| Error::InvalidContentLength(value.clone())),
        None => Ok(0),
    }
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HashMap<String, String>, Error> {
    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// How many bytes the request at the start of `input` occupies in total,
/// once its head has fully arrived. `None` while the head is incomplete.
///
/// A missing or unreadable Content-Length counts as an empty body here;
/// [`parse_request`] reports the malformed header. A length too large to
/// add up saturates at `usize::MAX`.
pub fn request_length(input: &[u8]) -> Option<usize> {
    let (head_len, terminator) = find_head_end(input)?;
    let body_len = std::str::from_utf8(&input[..head_len])
        .ok()
        .and_then(|head| parse_headers(head.lines().skip(1)).ok())
        .and_then(|headers| content_length(&headers).ok())
        .unwrap_or(0);
    Some((head_len + terminator).saturating_add(body_len))
}

/// Parse an HTTP request from a byte slice.
///
/// The body is taken from the bytes after the head, truncated to the
/// Content-Length when one is given.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, rest) = match find_head_end(input) {
        Some((head_len, terminator)) => (&input[..head_len], &input[head_len + terminator..]),
        None => (input, &input[input.len()..]),
    };

    let head = std::str::from_utf8(head).map_err(|_| Error::InvalidEncoding)?;
    let mut lines = head.lines();

    let request_line: RequestLine = match lines.next() {
        Some(line) if !line.trim().is_empty() => line.parse()?,
        _ => return Err(Error::EmptyRequest),
    };

    let headers = parse_headers(lines)?;

    if request_line.version.requires_host() && !headers.keys().any(|k| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let declared = content_length(&headers)?;
    let body = rest[..declared.min(rest.len())].to_vec();

    Ok(HttpRequest::with_body(
        request_line.method,
        request_line.target,
        request_line.version,
        headers,
        body,
    ))
}
