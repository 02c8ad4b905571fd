//! HTTP server implementation for microroute-rs.
//!
//! Accepts connections with tokio, reads one request per connection and
//! hands it to the [`Dispatcher`], which serves static files or runs the
//! matching route's handler.

mod config;
mod dispatcher;
mod error;
mod http_server;
mod response;
mod static_files;

// Re-export public items
pub use config::ServerConfig;
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use http_server::{serve, HttpServer};
pub use response::{http_date, HttpResponse, StatusCode};
