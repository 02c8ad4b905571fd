//! Route table and handler plumbing.
//!
//! Routes pair a regular-expression pattern with an HTTP method and a
//! [`Handler`]. Lookups scan routes in registration order and the first route
//! whose method matches and whose pattern covers the whole path wins, so more
//! specific patterns must be registered before the general ones that would
//! shadow them.

mod context;
mod error;
mod handler;
mod reply;
mod route;
mod table;
mod tests;

// Re-export public items
pub use context::Context;
pub use error::Error;
pub use handler::{ArgsFn, ContextArgsFn, ContextFn, Handler, PlainFn};
pub use reply::{JsonBody, Reply};
pub use route::Route;
pub use table::{RouteMatch, RouteTable};
