//! Tests for schema-driven binding.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};

    use crate::binder::{BindSchema, Error, FieldKind, FieldSpec, Source};
    use crate::parser::parse_request;
    use crate::router::RequestContext;

    fn context(raw: &[u8]) -> RequestContext {
        context_with_params(raw, HashMap::new())
    }

    fn context_with_params(raw: &[u8], params: HashMap<String, String>) -> RequestContext {
        RequestContext::from_request(parse_request(raw).unwrap(), params).unwrap()
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct User {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
    }

    fn user_schema() -> BindSchema {
        BindSchema::new()
            .field(FieldSpec::new("name", FieldKind::String))
            .field(FieldSpec::new("email", FieldKind::String))
    }

    #[test]
    fn test_bind_from_json_body() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 24\r\n\r\n{\"name\":\"a\",\"email\":\"b\"}",
        );

        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "a");
        assert_eq!(user.email, "b");
    }

    #[test]
    fn test_bind_from_query() {
        let ctx = context(b"GET /users?name=jane&email=jane%40example.com HTTP/1.1\r\nHost: x\r\n\r\n");

        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "jane");
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn test_bind_from_form_body() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 21\r\n\r\nname=jane&email=j%40x",
        );

        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "jane");
        assert_eq!(user.email, "j@x");
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let ctx = context(b"GET /users?name=jane HTTP/1.1\r\nHost: x\r\n\r\n");

        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "jane");
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_source_priority_path_wins() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            id: i64,
        }

        // id present in path, query, and body; path must win
        let params = HashMap::from([("id".to_string(), "1".to_string())]);
        let ctx = context_with_params(
            b"POST /things/1?id=2 HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 8\r\n\r\n{\"id\":4}",
            params,
        );

        let schema = BindSchema::new().field(FieldSpec::new("id", FieldKind::Int));
        let target: Target = schema.bind(&ctx).unwrap();
        assert_eq!(target.id, 1);
    }

    #[test]
    fn test_with_sources_restricts_lookup() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            id: i64,
        }

        let params = HashMap::from([("id".to_string(), "1".to_string())]);
        let ctx = context_with_params(b"GET /things/1?id=2 HTTP/1.1\r\nHost: x\r\n\r\n", params);

        let schema = BindSchema::new()
            .field(FieldSpec::new("id", FieldKind::Int).with_sources(vec![Source::Query]));
        let target: Target = schema.bind(&ctx).unwrap();
        assert_eq!(target.id, 2);
    }

    #[test]
    fn test_with_key_renames_lookup() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            email: String,
        }

        let ctx = context(b"GET /users?email_address=a%40b HTTP/1.1\r\nHost: x\r\n\r\n");

        let schema = BindSchema::new()
            .field(FieldSpec::new("email", FieldKind::String).with_key("email_address"));
        let target: Target = schema.bind(&ctx).unwrap();
        assert_eq!(target.email, "a@b");
    }

    #[test]
    fn test_malformed_json_body_fails_atomically() {
        // Query could satisfy both fields, but the body claims JSON and does
        // not parse; the bind must fail as a whole.
        let ctx = context(
            b"POST /users?name=jane&email=x HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 9\r\n\r\n{\"name\":;",
        );

        let result: Result<User, Error> = user_schema().bind(&ctx);
        assert!(matches!(result, Err(Error::MalformedBody(_))));
    }

    #[test]
    fn test_non_object_json_body_is_malformed() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 7\r\n\r\n[1,2,3]",
        );

        let result: Result<User, Error> = user_schema().bind(&ctx);
        assert!(matches!(result, Err(Error::MalformedBody(_))));
    }

    #[test]
    fn test_unsupported_content_type_for_required_body_field() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: text/csv\r\nContent-Length: 5\r\n\r\na,b,c",
        );

        let schema = BindSchema::new().field(
            FieldSpec::new("name", FieldKind::String)
                .with_sources(vec![Source::Body])
                .required(),
        );
        let result: Result<User, Error> = schema.bind(&ctx);
        assert!(matches!(result, Err(Error::UnsupportedContentType(ref ct)) if ct == "text/csv"));
    }

    #[test]
    fn test_unsupported_content_type_skipped_for_optional_field() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: text/csv\r\nContent-Length: 5\r\n\r\na,b,c",
        );

        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "");
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_missing_required_field() {
        let ctx = context(b"GET /users HTTP/1.1\r\nHost: x\r\n\r\n");

        let schema =
            BindSchema::new().field(FieldSpec::new("name", FieldKind::String).required());
        let result: Result<User, Error> = schema.bind(&ctx);
        assert!(matches!(result, Err(Error::MissingField(ref f)) if f == "name"));
    }

    #[test]
    fn test_type_mismatch_on_unparsable_int() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            #[allow(dead_code)]
            id: i64,
        }

        let ctx = context(b"GET /things?id=abc HTTP/1.1\r\nHost: x\r\n\r\n");

        let schema = BindSchema::new().field(FieldSpec::new("id", FieldKind::Int));
        let result: Result<Target, Error> = schema.bind(&ctx);
        assert!(matches!(result, Err(Error::TypeMismatch { ref field, .. }) if field == "id"));
    }

    #[test]
    fn test_kind_conversions_from_strings() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            count: i64,
            #[serde(default)]
            ratio: f64,
            #[serde(default)]
            active: bool,
        }

        let ctx = context(b"GET /t?count=42&ratio=2.5&active=true HTTP/1.1\r\nHost: x\r\n\r\n");

        let schema = BindSchema::new()
            .field(FieldSpec::new("count", FieldKind::Int))
            .field(FieldSpec::new("ratio", FieldKind::Float))
            .field(FieldSpec::new("active", FieldKind::Bool));
        let target: Target = schema.bind(&ctx).unwrap();
        assert_eq!(target.count, 42);
        assert!((target.ratio - 2.5).abs() < f64::EPSILON);
        assert!(target.active);
    }

    #[test]
    fn test_json_string_converts_to_declared_kind() {
        #[derive(Debug, Default, Deserialize)]
        struct Target {
            #[serde(default)]
            id: i64,
        }

        let ctx = context(
            b"POST /t HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 11\r\n\r\n{\"id\":\"42\"}",
        );

        let schema = BindSchema::new().field(FieldSpec::new("id", FieldKind::Int));
        let target: Target = schema.bind(&ctx).unwrap();
        assert_eq!(target.id, 42);
    }

    #[test]
    fn test_binding_is_idempotent() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 24\r\n\r\n{\"name\":\"a\",\"email\":\"b\"}",
        );

        let schema = user_schema();
        let first: User = schema.bind(&ctx).unwrap();
        let second: User = schema.bind(&ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_round_trip_is_stable() {
        let ctx = context(
            b"POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: 24\r\n\r\n{\"name\":\"a\",\"email\":\"b\"}",
        );

        let schema = user_schema();
        let bound: User = schema.bind(&ctx).unwrap();

        // Re-serialize the bound object and bind it again
        let body = serde_json::to_vec(&bound).unwrap();
        let raw = format!(
            "POST /users HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            String::from_utf8(body).unwrap()
        );
        let rebound: User = schema.bind(&context(raw.as_bytes())).unwrap();

        assert_eq!(bound, rebound);
    }

    #[test]
    fn test_multipart_fields_bind_through_form_source() {
        let body = b"--B\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\r\n\
            jane\r\n\
            --B--\r\n";
        let raw = format!(
            "POST /save HTTP/1.1\r\nHost: x\r\nContent-Type: multipart/form-data; boundary=B\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        let mut bytes = raw.into_bytes();
        bytes.extend_from_slice(body);

        let ctx = context(&bytes);
        let user: User = user_schema().bind(&ctx).unwrap();
        assert_eq!(user.name, "jane");
    }
}
