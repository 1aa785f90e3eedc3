//! Minimal switchyard example: a TOML route table, async handlers, and a
//! logging `next` step, dispatched in-process.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic

use std::time::Instant;

use http::{Method, StatusCode};
use switchyard::{AsyncRouter, BoxError, BoxedAsyncHandler, Request, Response, RouteConfig};
use tracing::info;

const ROUTES: &str = r#"
[[routes]]
name = "list_users"
options = ["GET", "/users", "users.list"]

[[routes]]
name = "show_user"
options = ["GET", "/users/{id}", "users.show"]

[[routes]]
name = "delete_user"
options = ["DELETE", "/users/{id}", "users.delete"]
"#;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt::init();

    let config: RouteConfig = ROUTES.parse()?;
    let routes = config
        .into_routes::<BoxedAsyncHandler>()
        .handler("users.list", list_users)
        .handler("users.show", show_user)
        .handler("users.delete", delete_user);
    let router = AsyncRouter::new(routes)?;

    for (method, path) in [
        (Method::GET, "/users"),
        (Method::GET, "/users/42"),
        (Method::DELETE, "/users/42"),
        (Method::POST, "/users/42"),
        (Method::GET, "/healthz"),
    ] {
        let started = Instant::now();
        let res = router
            .dispatch_then(Request::new(method.clone(), path), Response::new(), move |req, res| {
                info!(
                    %method,
                    path,
                    route = req.route_name().unwrap_or("-"),
                    status = res.status_code().as_u16(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "request handled",
                );
                res
            })
            .await?;
        println!("{path} -> {} {:?}", res.status_code(), res.body());
    }

    Ok(())
}

// GET /users
async fn list_users(_req: Request) -> Result<Response, BoxError> {
    Ok(Response::json(r#"[{"id":"42","name":"alice"}]"#))
}

// GET /users/{id}
async fn show_user(req: Request) -> Result<Response, BoxError> {
    let id = req.param("id").unwrap_or("unknown");
    Ok(Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#)))
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> Result<StatusCode, BoxError> {
    Ok(StatusCode::NO_CONTENT)
}
