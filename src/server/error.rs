//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::router::Error as RouteError;
use crate::server::response::{HttpResponse, StatusCode};

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A route could not be registered or its handler could not be called.
    #[error("Route error: {0}")]
    RouteError(#[from] RouteError),

    /// No route matches the method and path.
    #[error("No route for {0}")]
    NotFound(String),

    /// A structured reply could not be serialized.
    #[error("Encoding error: {0}")]
    EncodingError(#[from] serde_json::Error),

    /// The request exceeded the configured size limit.
    #[error("Request larger than {0} bytes")]
    PayloadTooLarge(usize),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ParseError(_) => StatusCode::BadRequest,
            Error::NotFound(_) => StatusCode::NotFound,
            Error::PayloadTooLarge(_) => StatusCode::PayloadTooLarge,
            Error::IoError(_) | Error::RouteError(_) | Error::EncodingError(_) | Error::InternalError(_) => {
                StatusCode::InternalServerError
            }
        }
    }

    /// The response sent to the client for this error.
    ///
    /// A missing route gets an empty body. Client errors explain themselves;
    /// server errors only carry the generic reason phrase.
    pub fn to_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            Error::NotFound(_) => HttpResponse::new(status),
            Error::ParseError(e) => HttpResponse::new(status)
                .with_content_type("text/plain; charset=utf-8")
                .with_body_string(format!("Error parsing request: {e}")),
            _ => HttpResponse::new(status)
                .with_content_type("text/plain; charset=utf-8")
                .with_body_string(status.reason_phrase()),
        }
    }
}
