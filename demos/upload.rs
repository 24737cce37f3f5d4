//! Multipart file upload: save the posted file, thank the sender.

use log::info;
use microroute_rs::{HttpServer, Method, Router, ServerConfig, ServerError, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    router.add_route(Method::POST, "/save", |ctx, writer| async move {
        let name = ctx.form_value("name").unwrap_or_default().to_string();
        let avatar = ctx
            .file("avatar")
            .ok_or_else(|| ServerError::InternalError("missing avatar file".to_string()))?;

        // Both the part data and the destination handle are released on
        // every exit path
        avatar
            .save(&avatar.filename)
            .await
            .map_err(ServerError::FileIo)?;

        writer.write_raw_html(StatusCode::Ok, format!("<b>Thank you!{name}</b>"))
    })?;

    let config = ServerConfig::with_addr("127.0.0.1:1323".parse()?);

    let server = HttpServer::new(config, router);
    info!("Starting server on http://127.0.0.1:1323");
    server.start().await?;

    Ok(())
}
