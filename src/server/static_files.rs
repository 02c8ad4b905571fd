//! Serving files from the configured static directory.

use std::path::{Component, Path, PathBuf};
use log::{debug, warn};
use tokio::fs;

use crate::parser::{HttpRequest, Method};
use crate::server::response::{HttpResponse, StatusCode};

/// Map a request path onto a file under `root`.
///
/// Only plain path segments are accepted, so `..`, absolute paths and drive
/// prefixes can never escape the directory.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Content type for a file, from its extension.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Answer `request` from `root` if it names an existing regular file.
///
/// Returns `None` whenever the request should fall through to the route
/// table: a method other than GET/HEAD, a path that does not resolve, a
/// directory, or a file that cannot be read.
pub async fn serve(root: &Path, request: &HttpRequest) -> Option<HttpResponse> {
    if !request.method.reads_static() {
        return None;
    }

    let file = resolve(root, &request.path)?;
    let metadata = fs::metadata(&file).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    let response = HttpResponse::new(StatusCode::Ok).with_content_type(content_type(&file));

    if request.method == Method::HEAD {
        debug!("HEAD {path} served from {file}", path = request.path, file = file.display());
        return Some(response.with_header("Content-Length", metadata.len().to_string()));
    }

    match fs::read(&file).await {
        Ok(bytes) => {
            debug!("GET {path} served from {file}", path = request.path, file = file.display());
            Some(response.with_body_bytes(bytes))
        }
        Err(e) => {
            warn!("Failed to read static file {file}: {e}", file = file.display());
            None
        }
    }
}
