//! The ordered route table.

use log::{debug, error};

use crate::parser::Method;
use crate::router::error::Error;
use crate::router::handler::Handler;
use crate::router::route::Route;

/// A successful lookup: the route and the strings its groups captured.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub captures: Vec<String>,
}

/// Routes in registration order, which is also match priority.
///
/// Registration takes `&mut self` and lookup takes `&self`; once the table
/// is handed to a server it is shared immutably and never changes again.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and append a route.
    ///
    /// A route that fails to compile, or whose capture groups do not match
    /// the handler's arity, is logged and discarded; the table is unchanged
    /// and later registrations proceed normally.
    pub fn register(&mut self, pattern: impl Into<String>, method: Method, handler: Handler) -> Result<(), Error> {
        let pattern = pattern.into();
        match Route::new(pattern.clone(), method, handler) {
            Ok(route) => {
                debug!("Registered route {method} {pattern}");
                self.routes.push(route);
                Ok(())
            }
            Err(e) => {
                error!("Rejected route {method} {pattern}: {e}");
                Err(e)
            }
        }
    }

    pub fn get(&mut self, pattern: impl Into<String>, handler: Handler) -> Result<(), Error> {
        self.register(pattern, Method::GET, handler)
    }

    pub fn post(&mut self, pattern: impl Into<String>, handler: Handler) -> Result<(), Error> {
        self.register(pattern, Method::POST, handler)
    }

    pub fn put(&mut self, pattern: impl Into<String>, handler: Handler) -> Result<(), Error> {
        self.register(pattern, Method::PUT, handler)
    }

    pub fn delete(&mut self, pattern: impl Into<String>, handler: Handler) -> Result<(), Error> {
        self.register(pattern, Method::DELETE, handler)
    }

    pub fn patch(&mut self, pattern: impl Into<String>, handler: Handler) -> Result<(), Error> {
        self.register(pattern, Method::PATCH, handler)
    }

    /// The first route, in registration order, whose method equals `method`
    /// and whose pattern matches all of `path`.
    pub fn find(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method() == method)
            .find_map(|route| route.captures(path).map(|captures| RouteMatch { route, captures }))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
