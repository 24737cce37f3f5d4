//! Binding a request into a typed struct and echoing it back as JSON.

use log::info;
use microroute_rs::{
    BindSchema, FieldKind, FieldSpec, HttpServer, Method, Router, ServerConfig, StatusCode,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct User {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    // Accepts the user as JSON, an urlencoded form, or query parameters
    router.add_route(Method::POST, "/users", |ctx, writer| async move {
        let schema = BindSchema::new()
            .field(FieldSpec::new("name", FieldKind::String))
            .field(FieldSpec::new("email", FieldKind::String));
        let user: User = schema.bind(&ctx)?;
        writer.write_json(StatusCode::Created, &user)
    })?;

    let config = ServerConfig::with_addr("127.0.0.1:1323".parse()?);

    let server = HttpServer::new(config, router);
    info!("Starting server on http://127.0.0.1:1323");
    server.start().await?;

    Ok(())
}
