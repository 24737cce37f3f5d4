//! The route table and dispatch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::parser::{HttpRequest, Method};
use crate::router::context::RequestContext;
use crate::router::error::Error;
use crate::router::pattern::RoutePattern;
use crate::server::{Error as ServerError, HttpResponse, ResponseWriter, TemplateStore};

/// Type alias for a boxed future returned by a handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), ServerError>> + Send>>;

/// Type alias for a stored handler: request context plus response writer in,
/// unit out; the response travels through the writer.
pub type HandlerFn = Arc<dyn Fn(RequestContext, ResponseWriter) -> HandlerFuture + Send + Sync>;

/// A registered route.
pub struct Route {
    /// The method to match.
    pub method: Method,
    /// The path pattern to match.
    pub pattern: RoutePattern,
    handler: HandlerFn,
}

/// Maps (method, path pattern) pairs to handlers.
///
/// Registration happens once at startup; afterwards the table is read-only
/// and `dispatch` takes `&self`, so a `Router` can be shared behind an
/// `Arc` across connection tasks without locking. Overlapping patterns are
/// resolved by registration order: the first registered match wins.
pub struct Router {
    routes: Vec<Route>,
    templates: Arc<TemplateStore>,
}

impl Router {
    /// Create a router with an empty template store.
    pub fn new() -> Self {
        Self::with_templates(TemplateStore::new())
    }

    /// Create a router whose response writers render from the given store.
    pub fn with_templates(templates: TemplateStore) -> Self {
        Self {
            routes: Vec::new(),
            templates: Arc::new(templates),
        }
    }

    /// Register a handler for a (method, pattern) pair.
    ///
    /// Registering the same pair twice is an error; overlapping but
    /// non-identical patterns are allowed and resolved by registration
    /// order.
    pub fn add_route<F, Fut>(
        &mut self,
        method: Method,
        pattern: impl Into<String>,
        handler: F,
    ) -> Result<(), Error>
    where
        F: Fn(RequestContext, ResponseWriter) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServerError>> + Send + 'static,
    {
        let pattern = pattern.into();
        if self
            .routes
            .iter()
            .any(|route| route.method == method && route.pattern.as_str() == pattern)
        {
            return Err(Error::DuplicateRoute { method, pattern });
        }

        let handler = Arc::new(
            move |ctx: RequestContext, writer: ResponseWriter| -> HandlerFuture {
                Box::pin(handler(ctx, writer))
            },
        );

        self.routes.push(Route {
            method,
            pattern: RoutePattern::parse(&pattern),
            handler,
        });

        Ok(())
    }

    /// The registered (method, pattern) pairs, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (Method, &str)> {
        self.routes
            .iter()
            .map(|route| (route.method, route.pattern.as_str()))
    }

    /// Dispatch a parsed request to the matching handler.
    ///
    /// Returns the single response the handler wrote. Fails with
    /// [`Error::NotFound`] when no pattern matches the path, with
    /// [`Error::MethodNotAllowed`] when patterns match under other methods
    /// only, and with [`ServerError::MissingResponse`] when the handler
    /// returned `Ok` without writing.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ServerError> {
        let mut allowed = Vec::new();
        let mut matched = None;

        for route in &self.routes {
            let Some(params) = route.pattern.matches(&request.path) else {
                continue;
            };
            if route.method == request.method {
                matched = Some((route, params));
                break;
            }
            if !allowed.contains(&route.method) {
                allowed.push(route.method);
            }
        }

        let Some((route, params)) = matched else {
            if allowed.is_empty() {
                return Err(Error::NotFound(request.path).into());
            }
            return Err(Error::MethodNotAllowed {
                method: request.method,
                path: request.path,
                allowed,
            }
            .into());
        };

        let context = RequestContext::from_request(request, params)?;
        let writer = ResponseWriter::new(self.templates.clone());
        let response = writer.response_slot();

        (route.handler)(context, writer).await?;

        let response = response
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        response.ok_or(ServerError::MissingResponse)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
