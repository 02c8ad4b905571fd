//! Per-request context handed to handlers that ask for it.

use std::collections::HashMap;
use serde::de::DeserializeOwned;

use crate::parser::{Error as ParserError, HttpRequest, Method};
use crate::router::table::RouteTable;
use crate::server::StatusCode;

/// Everything a handler may need to know about the request it is serving,
/// plus the bits of the response it is allowed to shape.
///
/// A context lives exactly as long as one request and is owned by the task
/// handling it.
#[derive(Debug)]
pub struct Context<'a> {
    request: HttpRequest,
    params: HashMap<String, String>,
    routes: &'a RouteTable,
    status: StatusCode,
    headers: HashMap<String, String>,
}

impl<'a> Context<'a> {
    /// Build the context for `request`.
    ///
    /// The parameter map holds the query parameters overlaid with the fields
    /// of a url-encoded body; a body field wins over a query parameter of the
    /// same name.
    pub fn new(request: HttpRequest, routes: &'a RouteTable) -> Self {
        let mut params = request.query_params.clone();
        params.extend(request.form_params());

        Self {
            request,
            params,
            routes,
            status: StatusCode::Ok,
            headers: HashMap::new(),
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn method(&self) -> Method {
        self.request.method
    }

    /// The decoded request path, without the query string.
    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.get_header(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.request.body
    }

    /// A query or form parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Decode a JSON request body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ParserError> {
        self.request.json()
    }

    /// Decode the query and form parameters into `T`.
    ///
    /// Every parameter is a string, so the fields of `T` must deserialize
    /// from strings.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let value = serde_json::to_value(&self.params)?;
        serde_json::from_value(value)
    }

    /// Read-only view of the routes this request is being dispatched against.
    pub fn routes(&self) -> &RouteTable {
        self.routes
    }

    /// Add or replace a response header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Override the status of a successful reply (200 by default).
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The status and headers the handler chose, consumed by the dispatcher.
    pub(crate) fn into_response_parts(self) -> (StatusCode, HashMap<String, String>) {
        (self.status, self.headers)
    }
}
