//! Named HTML templates, loaded once at startup.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template is registered under the requested name.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// A template file could not be read at load time.
    #[error("Failed to load template {name}: {source}")]
    LoadError {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a named template against a data value.
///
/// The seam where a real templating engine plugs in; [`TemplateStore`] is
/// the built-in implementation.
pub trait Renderer: Send + Sync {
    fn render(&self, name: &str, data: &Value) -> Result<Vec<u8>, TemplateError>;
}

/// An owned, immutable-after-init collection of named templates.
///
/// Built once at startup via [`with_template`](Self::with_template) or
/// [`load_dir`](Self::load_dir), then shared read-only behind the router
/// for the lifetime of the process.
///
/// Rendering substitutes `{{ key }}` placeholders from an object value;
/// a scalar data value is addressed as `{{ value }}`. Placeholders with no
/// matching key render as empty, the same zero-value stance the binder
/// takes for absent fields.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, String>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a name.
    pub fn with_template(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(name.into(), text.into());
        self
    }

    /// Load every `*.html` file in a directory, registering each under its
    /// file stem (`templates/hello.html` becomes `hello`).
    pub fn load_dir(mut self, dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::LoadError {
            name: dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::LoadError {
                name: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path).map_err(|source| {
                TemplateError::LoadError {
                    name: stem.to_string(),
                    source,
                }
            })?;
            self.templates.insert(stem.to_string(), text);
        }

        Ok(self)
    }

    /// Check if a template is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// The registered template names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Renderer for TemplateStore {
    fn render(&self, name: &str, data: &Value) -> Result<Vec<u8>, TemplateError> {
        let text = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        Ok(substitute(text, data).into_bytes())
    }
}

/// Replace `{{ key }}` placeholders with values from `data`.
fn substitute(text: &str, data: &Value) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                out.push_str(&lookup(data, key));
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder, emit the rest as-is
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

fn lookup(data: &Value, key: &str) -> String {
    let value = match data {
        Value::Object(map) => map.get(key),
        scalar if key == "value" => Some(scalar),
        _ => None,
    };

    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
