//! HTTP parser module.
//!
//! Turns the raw bytes of an HTTP/1.x request into an [`HttpRequest`] with a
//! decoded path, query parameters, headers and body.

mod error;
mod form;
mod request;
mod request_line;

// Re-export public items
pub use error::Error;
pub use form::parse_urlencoded;
pub use request::{parse_request, request_length, HttpRequest};
pub use request_line::{HttpVersion, Method, RequestLine};
