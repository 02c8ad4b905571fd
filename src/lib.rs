//! A minimal regex-routed HTTP server library.
//!
//! Routes pair a regular expression with an HTTP method and a handler.
//! Requests are matched against routes in registration order; the first
//! route whose method matches and whose pattern covers the entire path wins.
//! Capture groups are handed to the handler as strings, optionally after the
//! request [`Context`]. A handler returns a [`Reply`]: text is written as-is,
//! anything else is serialized to JSON.
//!
//! # Features
//!
//! - First-match-wins routing over anchored regular expressions
//! - Handler shapes fixed at registration time, so a pattern whose capture
//!   groups do not fit its handler is rejected before serving starts
//! - Query and url-encoded form parameters, JSON request bodies
//! - Optional static directory served ahead of the routes for GET and HEAD
//! - Async server on tokio with a connection limit and graceful shutdown
//!
//! # Examples
//!
//! ## Registering routes
//!
//! ```
//! use microroute_rs::{Context, Handler, Method, Reply, RouteTable};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let mut routes = RouteTable::new();
//! routes.get("/", Handler::plain(|| "<h1>home</h1>")).unwrap();
//! routes
//!     .get(
//!         "/user/([a-z]+)",
//!         Handler::context_arg(|_ctx: &mut Context, name: String| Reply::json(User { name })),
//!     )
//!     .unwrap();
//!
//! // Capture groups must line up with the handler.
//! assert!(routes.get("/post/(\\d+)", Handler::plain(|| "no args")).is_err());
//!
//! let found = routes.find(Method::GET, "/user/alice").unwrap();
//! assert_eq!(found.captures, vec!["alice".to_string()]);
//! assert!(routes.find(Method::GET, "/user/alice/extra").is_none());
//! ```
//!
//! ## Dispatching a request
//!
//! ```
//! use std::collections::HashMap;
//! use microroute_rs::{Dispatcher, Handler, HttpRequest, HttpVersion, Method, RouteTable, StatusCode};
//!
//! let mut routes = RouteTable::new();
//! routes.get("/hello", Handler::plain(|| "<h1>hi</h1>")).unwrap();
//! let dispatcher = Dispatcher::new(routes);
//!
//! let request = HttpRequest::new(Method::GET, "/hello", HttpVersion::Http10, HashMap::new());
//! let response = dispatcher.dispatch(request).unwrap();
//! assert_eq!(response.status, StatusCode::Ok);
//! assert_eq!(response.body, b"<h1>hi</h1>");
//! ```
//!
//! See the `demos` directory for complete servers.

// Export the parser module
pub mod parser;

// Export the router module
pub mod router;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use router::{Context, Error as RouteError, Handler, Reply, Route, RouteMatch, RouteTable};
pub use server::{serve, Dispatcher, Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
