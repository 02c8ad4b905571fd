//! Serve a directory of files, with an API route alongside.
//!
//! ```text
//! cargo run --example static_site -- ./public
//! ```

use std::path::PathBuf;

use microroute_rs::{Handler, HttpServer, Reply, RouteTable, ServerConfig};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("public"));
    info!("Serving {dir}", dir = dir.display());

    let mut routes = RouteTable::new();
    routes.get("/api/health", Handler::plain(|| Reply::json(serde_json::json!({ "status": "ok" }))))?;
    routes.get("/", Handler::plain(|| "<a href=\"/index.html\">index</a>"))?;

    let config = ServerConfig::default().with_static_dir(dir);
    HttpServer::new(config, routes).start().await?;

    Ok(())
}
