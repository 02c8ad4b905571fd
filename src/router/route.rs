//! A single route: pattern, method and handler.

use regex::Regex;

use crate::parser::Method;
use crate::router::error::Error;
use crate::router::handler::Handler;

/// A compiled route. Immutable once built.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    matcher: Regex,
    method: Method,
    handler: Handler,
}

impl Route {
    /// Compile `pattern` and bind it to `handler`.
    ///
    /// The pattern is anchored at both ends so that it can only ever match a
    /// whole path. The handler must take exactly as many captured parameters
    /// as the pattern has capture groups.
    pub fn new(pattern: impl Into<String>, method: Method, handler: Handler) -> Result<Self, Error> {
        let pattern = pattern.into();
        let invalid = |source| Error::InvalidPattern {
            pattern: pattern.clone(),
            source,
        };
        // The bare pattern is compiled first so that something like `a)|(b`
        // cannot become valid by being wrapped.
        Regex::new(&pattern).map_err(invalid)?;
        let matcher = Regex::new(&format!("^(?:{pattern})$")).map_err(invalid)?;

        // Group 0 is the whole match.
        let groups = matcher.captures_len() - 1;
        if groups != handler.arity() {
            return Err(Error::ArityMismatch {
                expected: handler.arity(),
                found: groups,
            });
        }

        Ok(Self {
            pattern,
            matcher,
            method,
            handler,
        })
    }

    /// The pattern as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Match `path` in its entirety and return the captured groups in order.
    ///
    /// A group that did not take part in the match yields an empty string.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.matcher.captures(path)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != path.len() {
            return None;
        }

        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}
