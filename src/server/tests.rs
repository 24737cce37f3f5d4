//! Tests for the HTTP server implementation.

#[cfg(test)]
mod server_tests {
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use serde_json::json;
    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    use crate::binder::{BindSchema, FieldKind, FieldSpec, Source};
    use crate::parser::Method;
    use crate::router::Router;
    use crate::server::{
        Error, HttpResponse, HttpServer, Renderer, ResponseWriter, ServerConfig, StatusCode,
        TemplateError, TemplateStore,
    };

    // Mock TcpStream for testing
    struct MockTcpStream {
        read_data: Cursor<Vec<u8>>,
        write_data: Vec<u8>,
    }

    impl MockTcpStream {
        fn new(read_data: Vec<u8>) -> Self {
            Self {
                read_data: Cursor::new(read_data),
                write_data: Vec::new(),
            }
        }

        fn written_data(&self) -> &[u8] {
            &self.write_data
        }
    }

    impl AsyncRead for MockTcpStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let n = std::io::Read::read(&mut this.read_data, buf.initialize_unfilled())?;
            buf.advance(n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockTcpStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.write_data.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn test_router() -> Arc<Router> {
        let mut router = Router::new();
        router
            .add_route(Method::GET, "/test", |_ctx, writer| async move {
                writer.write_text(StatusCode::Ok, "Test response")
            })
            .unwrap();
        Arc::new(router)
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.max_connections, 1024);
        assert_eq!(config.read_buffer_size, 8192);
    }

    #[test]
    fn test_server_creation() {
        let config = ServerConfig {
            addr: "127.0.0.1:8080".parse().unwrap(),
            max_connections: 100,
            read_buffer_size: 4096,
        };

        let server = HttpServer::new(config.clone(), Router::new());
        assert_eq!(server.config.addr, config.addr);
        assert_eq!(server.config.max_connections, config.max_connections);
        assert_eq!(server.config.read_buffer_size, config.read_buffer_size);
    }

    #[tokio::test]
    async fn test_handle_connection_with_valid_request() {
        let request = b"GET /test HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, test_router(), 1024).await;
        assert!(result.is_ok());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/plain"));
        assert!(response.contains("Test response"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_not_found() {
        let request = b"GET /nonexistent HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, test_router(), 1024).await;
        assert!(result.is_err());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.contains("Not found: /nonexistent"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_method_not_allowed() {
        let request = b"POST /test HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, test_router(), 1024).await;
        assert!(result.is_err());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
        assert!(response.contains("Method POST not allowed for path: /test"));
        assert!(response.contains("Allow: GET\r\n"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_invalid_request() {
        let request = b"INVALID REQUEST";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, test_router(), 1024).await;
        assert!(result.is_err());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn test_handle_connection_reads_full_body() {
        let mut router = Router::new();
        router
            .add_route(Method::POST, "/echo", |ctx, writer| async move {
                let name = ctx.form_value("name").unwrap_or_default();
                writer.write_text(StatusCode::Ok, format!("name:{name}"))
            })
            .unwrap();

        let request = b"POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 9\r\n\r\nname=jane";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, Arc::new(router), 1024).await;
        assert!(result.is_ok());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.contains("name:jane"));
    }

    #[tokio::test]
    async fn test_handle_connection_translates_bind_error_to_400() {
        let mut router = Router::new();
        router
            .add_route(Method::POST, "/users", |ctx, writer| async move {
                let schema = BindSchema::new().field(
                    FieldSpec::new("name", FieldKind::String)
                        .with_sources(vec![Source::Body])
                        .required(),
                );
                let user: serde_json::Value = schema.bind(&ctx)?;
                writer.write_json(StatusCode::Created, &user)
            })
            .unwrap();

        let request = b"POST /users HTTP/1.1\r\nHost: localhost\r\nContent-Type: text/csv\r\nContent-Length: 5\r\n\r\na,b,c";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, Arc::new(router), 1024).await;
        assert!(result.is_err());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.contains("Unsupported content type"));
    }

    #[tokio::test]
    async fn test_handle_connection_translates_template_error_to_500() {
        let mut router = Router::with_templates(TemplateStore::new());
        router
            .add_route(Method::GET, "/page", |_ctx, writer| async move {
                writer.write_html(StatusCode::Ok, "missing", &json!({}))
            })
            .unwrap();

        let request = b"GET /page HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = MockTcpStream::new(request.to_vec());

        let result = HttpServer::handle_connection(&mut stream, Arc::new(router), 1024).await;
        assert!(result.is_err());

        let response = String::from_utf8_lossy(stream.written_data());
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.contains("Template not found: missing"));
    }

    #[test]
    fn test_template_store_renders_object_values() {
        let store = TemplateStore::new()
            .with_template("hello", "<h1>Hello {{ name }}!</h1><p>{{ count }}</p>");

        let body = store
            .render("hello", &json!({"name": "world", "count": 3}))
            .unwrap();
        assert_eq!(body, b"<h1>Hello world!</h1><p>3</p>");
    }

    #[test]
    fn test_template_store_renders_scalar_value() {
        let store = TemplateStore::new().with_template("hello", "Hello {{ value }}!");

        let body = store.render("hello", &json!("world")).unwrap();
        assert_eq!(body, b"Hello world!");
    }

    #[test]
    fn test_template_store_unknown_key_renders_empty() {
        let store = TemplateStore::new().with_template("hello", "[{{ missing }}]");

        let body = store.render("hello", &json!({"name": "x"})).unwrap();
        assert_eq!(body, b"[]");
    }

    #[test]
    fn test_template_store_missing_template() {
        let store = TemplateStore::new();
        let result = store.render("absent", &json!({}));
        assert!(matches!(result, Err(TemplateError::NotFound(ref n)) if n == "absent"));
    }

    #[test]
    fn test_template_store_load_dir() {
        let dir = std::env::temp_dir().join(format!("microroute-tpl-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.html"), "Hello {{ name }}").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::new().load_dir(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(store.contains("hello"));
        assert!(!store.contains("notes"));
    }

    #[test]
    fn test_writer_allows_exactly_one_write() {
        let writer = ResponseWriter::new(Arc::new(TemplateStore::new()));
        let slot = writer.response_slot();

        writer.write_text(StatusCode::Ok, "first").unwrap();
        let second = writer.write_json(StatusCode::Created, &json!({"x": 1}));
        assert!(matches!(second, Err(Error::ResponseAlreadyWritten)));

        let response = slot.lock().unwrap().take().unwrap();
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body, b"first");
    }

    #[test]
    fn test_writer_json_sets_content_type() {
        let writer = ResponseWriter::new(Arc::new(TemplateStore::new()));
        let slot = writer.response_slot();

        writer
            .write_json(StatusCode::Ok, &json!({"hello": "world"}))
            .unwrap();

        let response = slot.lock().unwrap().take().unwrap();
        assert_eq!(
            response.headers.get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(response.body, br#"{"hello":"world"}"#);
    }

    #[test]
    fn test_error_status_translation() {
        use crate::router::Error as RouterError;

        let not_found = Error::Router(RouterError::NotFound("/x".to_string()));
        assert_eq!(not_found.status(), StatusCode::NotFound);

        let method = Error::Router(RouterError::MethodNotAllowed {
            method: Method::POST,
            path: "/x".to_string(),
            allowed: vec![Method::GET],
        });
        assert_eq!(method.status(), StatusCode::MethodNotAllowed);

        let bind = Error::Bind(crate::binder::Error::MissingField("name".to_string()));
        assert_eq!(bind.status(), StatusCode::BadRequest);

        let template = Error::Template(TemplateError::NotFound("hello".to_string()));
        assert_eq!(template.status(), StatusCode::InternalServerError);

        let file = Error::FileIo(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(file.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn test_response_to_bytes() {
        let response = HttpResponse::new(StatusCode::Created)
            .with_content_type("text/plain")
            .with_body_string("made");

        let bytes = response.to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nmade"));
    }
}
