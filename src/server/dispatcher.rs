//! Per-request dispatch: static files, route lookup, handler invocation and
//! reply encoding.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use log::{debug, error};

use crate::parser::HttpRequest;
use crate::router::{Context, Reply, RouteTable};
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::static_files;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

/// Turns requests into responses using a frozen route table.
///
/// `handle` only ever reads the table, so one dispatcher can serve any number
/// of concurrent requests.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    static_dir: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            static_dir: None,
        }
    }

    /// Serve files from `dir` for GET and HEAD requests before consulting any route.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref()
    }

    /// Produce the response for one request. Never fails: every error is
    /// logged and turned into an error response.
    pub async fn handle(&self, request: HttpRequest) -> HttpResponse {
        if let Some(dir) = &self.static_dir {
            if let Some(response) = static_files::serve(dir, &request).await {
                return response;
            }
        }

        let method = request.method;
        let path = request.path.clone();
        match self.dispatch(request) {
            Ok(response) => {
                debug!("{method} {path} -> {status}", status = response.status.as_u16());
                response
            }
            Err(Error::NotFound(target)) => {
                debug!("No route for {target}");
                Error::NotFound(target).to_response()
            }
            Err(e) => {
                error!("{method} {path} failed: {e}");
                e.to_response()
            }
        }
    }

    /// Route `request` to its handler and encode the reply.
    ///
    /// Scanning stops at the first matching route, whatever its handler does.
    /// A handler that panics yields [`Error::InternalError`].
    pub fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let mut ctx = Context::new(request, &self.routes);

        let found = self
            .routes
            .find(ctx.method(), ctx.path())
            .ok_or_else(|| Error::NotFound(format!("{} {}", ctx.method(), ctx.path())))?;

        let handler = found.route.handler();
        let reply = panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(&mut ctx, found.captures)))
            .map_err(|payload| Error::InternalError(format!("handler panicked: {}", panic_message(&*payload))))??;
        let (status, headers) = ctx.into_response_parts();
        encode(reply, status, headers)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}

/// Build the response for a handler's reply.
///
/// A raw body defaults to HTML unless the handler chose its own content
/// type; a structured body is always sent as JSON.
fn encode(reply: Reply, status: StatusCode, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
    let structured = reply.is_structured();
    let body = reply.encode()?;

    let mut response = HttpResponse::new(status).with_content_type(HTML);
    for (name, value) in headers {
        response = response.with_header(name, value);
    }
    if structured {
        response = response.with_content_type(JSON);
    }

    Ok(response.with_body_bytes(body))
}
