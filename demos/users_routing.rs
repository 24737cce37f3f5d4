//! Routing basics: form posts, query parameters, and path captures.

use log::info;
use microroute_rs::{HttpServer, Method, Router, ServerConfig, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let mut router = Router::new();

    router.add_route(Method::POST, "/save", |ctx, writer| async move {
        let name = ctx.form_value("name").unwrap_or_default();
        let email = ctx.form_value("email").unwrap_or_default();
        writer.write_text(StatusCode::Ok, format!("name:{name}, email:{email}"))
    })?;

    router.add_route(Method::GET, "/show", |ctx, writer| async move {
        let team = ctx.query("team").unwrap_or_default();
        let member = ctx.query("member").unwrap_or_default();
        writer.write_text(StatusCode::Ok, format!("team:{team}, member:{member}"))
    })?;

    router.add_route(Method::GET, "/users/:id", |ctx, writer| async move {
        let id = ctx.param("id").unwrap_or_default().to_string();
        writer.write_text(StatusCode::Ok, id)
    })?;

    let config = ServerConfig::with_addr("127.0.0.1:1323".parse()?);

    let server = HttpServer::new(config, router);
    info!("Starting server on http://127.0.0.1:1323");
    server.start().await?;

    Ok(())
}
