//! Template-rendered pages next to a JSON API, sharing one router.

use log::info;
use microroute_rs::{
    BindSchema, FieldKind, FieldSpec, HttpServer, Method, Router, ServerConfig, StatusCode,
    TemplateStore,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
struct HelloParam {
    #[serde(default)]
    greetingto: String,
}

fn greeting_schema() -> BindSchema {
    BindSchema::new().field(FieldSpec::new("greetingto", FieldKind::String))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Templates are registered once here and read-only afterwards
    let templates = TemplateStore::new()
        .with_template("hello", "<h1>Hello {{ value }}!</h1>")
        .with_template(
            "hello_form",
            "<form method=\"post\" action=\"/hello\">\
             <p>Greeted: {{ value }}</p>\
             <input name=\"greetingto\"><button>Greet</button></form>",
        );

    let mut router = Router::with_templates(templates);

    router.add_route(Method::GET, "/", |_ctx, writer| async move {
        writer.write_html(StatusCode::Ok, "hello", &json!("world"))
    })?;

    router.add_route(Method::GET, "/hello", |ctx, writer| async move {
        let greetingto = ctx.query("greetingto").unwrap_or_default().to_string();
        writer.write_html(StatusCode::Ok, "hello", &json!(greetingto))
    })?;

    router.add_route(Method::POST, "/hello", |ctx, writer| async move {
        let greetingto = ctx.form_value("greetingto").unwrap_or_default().to_string();
        writer.write_html(StatusCode::Ok, "hello_form", &json!(greetingto))
    })?;

    router.add_route(Method::GET, "/hello_form", |_ctx, writer| async move {
        writer.write_html(StatusCode::Ok, "hello_form", &json!(null))
    })?;

    router.add_route(Method::GET, "/api/hello", |ctx, writer| async move {
        let greetingto = ctx.query("greetingto").unwrap_or_default();
        writer.write_json(StatusCode::Ok, &json!({ "hello": greetingto }))
    })?;

    router.add_route(Method::POST, "/api/hello", |ctx, writer| async move {
        let param: HelloParam = greeting_schema().bind(&ctx)?;
        writer.write_json(StatusCode::Ok, &json!({ "hello": param.greetingto }))
    })?;

    let config = ServerConfig::with_addr("127.0.0.1:3000".parse()?);

    let server = HttpServer::new(config, router);
    info!("Starting server on http://127.0.0.1:3000");
    server.start().await?;

    Ok(())
}
