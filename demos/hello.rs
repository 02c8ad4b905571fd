//! A small server showing each handler shape.
//!
//! ```text
//! curl http://127.0.0.1:9000/
//! curl http://127.0.0.1:9000/user/alice
//! curl -d 'name=bob' http://127.0.0.1:9000/
//! curl -H 'Content-Type: application/json' -d '{"name":"carol"}' http://127.0.0.1:9000/
//! ```

use microroute_rs::{Context, Handler, HttpServer, Reply, RouteTable, ServerConfig, StatusCode};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Person {
    name: String,
}

/// Accept a person either as JSON or as form fields.
fn create_person(ctx: &mut Context) -> Reply {
    let person = if ctx.request().is_json() {
        ctx.json::<Person>().map_err(|e| e.to_string())
    } else {
        ctx.form::<Person>().map_err(|e| e.to_string())
    };

    match person {
        Ok(person) => {
            info!("Created {person:?}");
            ctx.set_status(StatusCode::Created);
            Reply::json(person)
        }
        Err(e) => {
            ctx.set_status(StatusCode::BadRequest);
            Reply::from(e)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut routes = RouteTable::new();
    routes.get("/", Handler::plain(|| "<h1>123</h1>"))?;
    routes.post("/", Handler::with_context(create_person))?;
    routes.get(
        "/user/([a-z]+)",
        Handler::context_arg(|_ctx: &mut Context, name: String| Reply::json(Person { name })),
    )?;
    routes.get(
        "/add/(\\d+)/(\\d+)",
        Handler::with_args(2, |args| {
            let sum: u64 = args.iter().filter_map(|n| n.parse::<u64>().ok()).sum();
            Reply::json(sum)
        }),
    )?;
    routes.get(
        "/routes",
        Handler::with_context(|ctx: &mut Context| {
            let listed: Vec<String> = ctx
                .routes()
                .routes()
                .iter()
                .map(|route| format!("{} {}", route.method(), route.pattern()))
                .collect();
            Reply::json(listed)
        }),
    )?;

    let config = ServerConfig::default().with_addr("127.0.0.1:9000".parse()?);
    HttpServer::new(config, routes).start().await?;

    Ok(())
}
