//! Binding schemas: per-field source lists, keys, and kinds.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::binder::error::Error;
use crate::router::RequestContext;

/// Where a field's value may come from, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A parameter captured from the route pattern.
    Path,
    /// A query parameter.
    Query,
    /// A form field (urlencoded or multipart).
    Form,
    /// The parsed request body (JSON object or urlencoded form).
    Body,
}

/// The default source priority: path, then query, then form, then body.
const DEFAULT_SOURCES: [Source; 4] = [Source::Path, Source::Query, Source::Form, Source::Body];

/// The type a string source value is converted to before deserialization.
///
/// Values arriving from a JSON body are already typed and pass through,
/// except JSON strings bound to a non-string kind, which convert the same
/// way query strings do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    Float,
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Describes how one field of the target type is populated.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// The field name on the target type.
    pub field: String,
    /// The key looked up in each source (defaults to the field name).
    pub key: String,
    /// The conversion applied to string source values.
    pub kind: FieldKind,
    /// The sources tried, in order.
    pub sources: Vec<Source>,
    /// Whether the bind fails when no source has the field.
    pub required: bool,
}

impl FieldSpec {
    /// A field resolved from all sources in the default priority order.
    pub fn new(field: impl Into<String>, kind: FieldKind) -> Self {
        let field = field.into();
        Self {
            key: field.clone(),
            field,
            kind,
            sources: DEFAULT_SOURCES.to_vec(),
            required: false,
        }
    }

    /// Look the field up under a different key than the target field name.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Restrict or reorder the sources the field resolves from.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Make the bind fail when no source satisfies the field.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The parsed-once view of the request body a bind works against.
enum BodyValues {
    /// No body, or no field asked for one.
    Empty,
    /// A JSON object body.
    Json(Map<String, Value>),
    /// An urlencoded form body (fields shared with the Form source).
    Form,
    /// A body in a content type the binder cannot read.
    Unsupported(String),
}

/// An explicit description of how to populate a target type from a request.
///
/// Binding is a pure function of the context: binding the same context
/// twice yields identical results. Fields no source satisfies are absent
/// from the assembled object, so optional fields on the target take their
/// `#[serde(default)]` zero values.
#[derive(Debug, Clone, Default)]
pub struct BindSchema {
    fields: Vec<FieldSpec>,
}

impl BindSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the schema.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Bind the context into a typed object.
    ///
    /// The body is inspected at most once per bind, before any field
    /// resolves: a body claiming JSON that does not parse as a JSON object
    /// fails the whole bind with [`Error::MalformedBody`], even when every
    /// field could have resolved from an earlier source.
    pub fn bind<T: DeserializeOwned>(&self, context: &RequestContext) -> Result<T, Error> {
        let body = self.parse_body(context)?;

        let mut values = Map::new();
        for spec in &self.fields {
            if let Some(value) = Self::resolve(spec, context, &body)? {
                values.insert(spec.field.clone(), value);
            } else if spec.required {
                return Err(Error::MissingField(spec.field.clone()));
            }
        }

        serde_json::from_value(Value::Object(values)).map_err(Error::Deserialize)
    }

    /// Decide once how the body reads, if any field wants it.
    fn parse_body(&self, context: &RequestContext) -> Result<BodyValues, Error> {
        let body_wanted = self
            .fields
            .iter()
            .any(|spec| spec.sources.contains(&Source::Body));
        if !body_wanted || context.body.is_empty() {
            return Ok(BodyValues::Empty);
        }

        if context.is_json() {
            return match serde_json::from_slice::<Value>(&context.body) {
                Ok(Value::Object(map)) => Ok(BodyValues::Json(map)),
                Ok(_) => Err(Error::MalformedBody(
                    "JSON body is not an object".to_string(),
                )),
                Err(e) => Err(Error::MalformedBody(e.to_string())),
            };
        }

        if context.is_form_urlencoded() {
            // The context already parsed the form body into form_fields
            return Ok(BodyValues::Form);
        }

        Ok(BodyValues::Unsupported(
            context.content_type().unwrap_or("none").to_string(),
        ))
    }

    /// Resolve one field against its sources, first hit wins.
    fn resolve(
        spec: &FieldSpec,
        context: &RequestContext,
        body: &BodyValues,
    ) -> Result<Option<Value>, Error> {
        for source in &spec.sources {
            let raw = match source {
                Source::Path => context.path_params.get(&spec.key).cloned().map(Value::String),
                Source::Query => context.query_params.get(&spec.key).cloned().map(Value::String),
                Source::Form => context.form_fields.get(&spec.key).cloned().map(Value::String),
                Source::Body => match body {
                    BodyValues::Empty => None,
                    BodyValues::Json(map) => map.get(&spec.key).cloned(),
                    BodyValues::Form => {
                        context.form_fields.get(&spec.key).cloned().map(Value::String)
                    }
                    BodyValues::Unsupported(content_type) => {
                        if spec.required {
                            return Err(Error::UnsupportedContentType(content_type.clone()));
                        }
                        None
                    }
                },
            };

            if let Some(value) = raw {
                return Ok(Some(Self::convert(spec, value)?));
            }
        }

        Ok(None)
    }

    /// Convert a source value to the field's declared kind.
    fn convert(spec: &FieldSpec, value: Value) -> Result<Value, Error> {
        let text = match value {
            // Strings convert by kind; everything else arrived typed from a
            // JSON body and passes through.
            Value::String(s) => s,
            other => return Ok(other),
        };

        let mismatch = |text: &str| Error::TypeMismatch {
            field: spec.field.clone(),
            kind: spec.kind,
            value: text.to_string(),
        };

        match spec.kind {
            FieldKind::String => Ok(Value::String(text)),
            FieldKind::Int => text
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| mismatch(&text)),
            FieldKind::Float => text
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| mismatch(&text)),
            FieldKind::Bool => text.parse::<bool>().map(Value::Bool).map_err(|_| mismatch(&text)),
        }
    }
}
