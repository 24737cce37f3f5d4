//! The response-writing capability handed to handlers.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::templates::{Renderer, TemplateStore};

/// Shared slot the dispatcher reads the finished response from.
pub(crate) type ResponseSlot = Arc<Mutex<Option<HttpResponse>>>;

/// Writes exactly one response per request.
///
/// Handlers receive a `ResponseWriter` alongside the request context and
/// must call exactly one of the write methods. A second call fails with
/// [`Error::ResponseAlreadyWritten`] and leaves the first response in
/// place; returning without any call makes dispatch fail with
/// [`Error::MissingResponse`].
pub struct ResponseWriter {
    templates: Arc<TemplateStore>,
    slot: ResponseSlot,
}

impl ResponseWriter {
    /// Create a writer rendering templates from the given store.
    pub(crate) fn new(templates: Arc<TemplateStore>) -> Self {
        Self {
            templates,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// The slot this writer stores its response in.
    pub(crate) fn response_slot(&self) -> ResponseSlot {
        self.slot.clone()
    }

    /// Write a JSON response.
    pub fn write_json<T: Serialize>(&self, status: StatusCode, value: &T) -> Result<(), Error> {
        let response = HttpResponse::new(status).with_json(value)?;
        self.store(response)
    }

    /// Render a named template and write it as an HTML response.
    pub fn write_html(&self, status: StatusCode, template: &str, data: &Value) -> Result<(), Error> {
        let body = self.templates.render(template, data)?;
        let response = HttpResponse::new(status)
            .with_content_type("text/html; charset=utf-8")
            .with_body_bytes(body);
        self.store(response)
    }

    /// Write a plain-text response.
    pub fn write_text(&self, status: StatusCode, body: impl Into<String>) -> Result<(), Error> {
        let response = HttpResponse::new(status)
            .with_content_type("text/plain; charset=utf-8")
            .with_body_string(body);
        self.store(response)
    }

    /// Write raw HTML without going through the template store.
    pub fn write_raw_html(&self, status: StatusCode, body: impl Into<String>) -> Result<(), Error> {
        let response = HttpResponse::new(status)
            .with_content_type("text/html; charset=utf-8")
            .with_body_string(body);
        self.store(response)
    }

    fn store(&self, response: HttpResponse) -> Result<(), Error> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(Error::ResponseAlreadyWritten);
        }
        *slot = Some(response);
        Ok(())
    }
}
