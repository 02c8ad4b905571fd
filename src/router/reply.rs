//! What a handler hands back to the dispatcher.

use std::fmt;
use serde::Serialize;

/// A value that can be rendered as a JSON response body.
///
/// Implemented for every `Serialize + Send` type, so handlers never need to
/// name it directly; see [`Reply::json`].
pub trait JsonBody: Send {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error>;
}

impl<T: Serialize + Send> JsonBody for T {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// The single value every handler returns.
///
/// `RawBody` is written to the client byte-for-byte. `Structured` is
/// serialized with `serde_json` when the response is built, so a value that
/// cannot be serialized surfaces as a dispatch error rather than a panic.
pub enum Reply {
    RawBody(Vec<u8>),
    Structured(Box<dyn JsonBody>),
}

impl Reply {
    /// A reply written verbatim.
    pub fn raw(body: impl Into<Vec<u8>>) -> Self {
        Reply::RawBody(body.into())
    }

    /// A reply serialized as JSON.
    pub fn json<T: Serialize + Send + 'static>(value: T) -> Self {
        Reply::Structured(Box::new(value))
    }

    /// Render the body bytes.
    pub fn encode(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Reply::RawBody(bytes) => Ok(bytes),
            Reply::Structured(value) => value.to_json(),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Reply::Structured(_))
    }
}

impl From<String> for Reply {
    fn from(body: String) -> Self {
        Reply::RawBody(body.into_bytes())
    }
}

impl From<&str> for Reply {
    fn from(body: &str) -> Self {
        Reply::RawBody(body.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Reply {
    fn from(body: Vec<u8>) -> Self {
        Reply::RawBody(body)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::RawBody(bytes) => f.debug_tuple("RawBody").field(&String::from_utf8_lossy(bytes)).finish(),
            Reply::Structured(_) => f.write_str("Structured(..)"),
        }
    }
}
