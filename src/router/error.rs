//! Error types for route registration and handler invocation.

use thiserror::Error;

/// Errors raised by the route table.
#[derive(Debug, Error)]
pub enum Error {
    /// The route pattern is not a valid regular expression.
    #[error("Invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The handler declares a different number of captured parameters than were supplied.
    #[error("Handler takes {expected} captured parameters but {found} were supplied")]
    ArityMismatch { expected: usize, found: usize },
}
